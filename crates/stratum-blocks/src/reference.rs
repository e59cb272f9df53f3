//! Block names and registration for the reference block set.

use stratum_behavior::{
    BlockAttributes, BlockDef, Capabilities, Registry, RegistryBuilder, RegistryError,
};
use stratum_core::Fluid;

use crate::crop::{self, Crop};
use crate::falling::Falling;
use crate::fluid::FlowingFluid;
use crate::redstone::{self, Lamp, Lever};
use crate::slab::{self, Waterloggable};
use crate::torch::{self, Torch};
use crate::weathering::{self, Weathering};

/// Full solid block with no behavior.
pub const STONE: &str = "stone";
/// Replaceable ground cover.
pub const GRASS: &str = "short_grass";
/// Wall or floor torch.
pub const TORCH: &str = "torch";
/// Growable crop.
pub const WHEAT: &str = "wheat";
/// Oxidizing metal block.
pub const COPPER_BLOCK: &str = "copper_block";
/// Oxidizing metal block sharing the copper oxidation domain.
pub const CUT_COPPER: &str = "cut_copper";
/// Falling block.
pub const SAND: &str = "sand";
/// Falling block.
pub const GRAVEL: &str = "gravel";
/// Signal source.
pub const LEVER: &str = "lever";
/// Signal consumer.
pub const LAMP: &str = "redstone_lamp";
/// Waterloggable half block.
pub const OAK_SLAB: &str = "oak_slab";

/// Every reference block name, in registration order.
pub const ALL: [&str; 11] = [
    STONE, GRASS, TORCH, WHEAT, COPPER_BLOCK, CUT_COPPER, SAND, GRAVEL, LEVER, LAMP, OAK_SLAB,
];

/// Register the reference blocks and the water and lava behaviors.
pub fn register_reference_blocks(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder.register(BlockDef::new(STONE))?;
    builder.register(
        BlockDef::new(GRASS).attributes(BlockAttributes {
            replaceable: true,
            ..BlockAttributes::DECORATION
        }),
    )?;
    builder.register(
        BlockDef::new(TORCH)
            .property(torch::facing_property())
            .behavior(Torch)
            .attributes(BlockAttributes::DECORATION),
    )?;
    builder.register(
        BlockDef::new(WHEAT)
            .property(crop::age_property())
            .behavior(Crop::default())
            .capabilities(Capabilities::new().growable(Crop::default()))
            .attributes(BlockAttributes::DECORATION),
    )?;
    for name in [COPPER_BLOCK, CUT_COPPER] {
        builder.register(
            BlockDef::new(name)
                .property(weathering::oxidation_property())
                .capabilities(Capabilities::new().change_over_time(Weathering)),
        )?;
    }
    for (name, sound) in [(SAND, "sand.fall"), (GRAVEL, "gravel.fall")] {
        builder.register(
            BlockDef::new(name)
                .behavior(Falling::new(sound))
                .capabilities(Capabilities::new().fallable(Falling::new(sound))),
        )?;
    }
    builder.register(
        BlockDef::new(LEVER)
            .property(redstone::powered_property())
            .behavior(Lever)
            .capabilities(Capabilities::new().power_source(Lever))
            .attributes(BlockAttributes::DECORATION),
    )?;
    builder.register(
        BlockDef::new(LAMP)
            .property(redstone::lit_property())
            .behavior(Lamp),
    )?;
    builder.register(
        BlockDef::new(OAK_SLAB)
            .property(slab::half_property())
            .property(slab::waterlogged_property())
            .capabilities(
                Capabilities::new()
                    .fluid_container(Waterloggable)
                    .fluid_source(Waterloggable),
            )
            .attributes(BlockAttributes {
                opaque: false,
                ..BlockAttributes::SOLID
            }),
    )?;
    builder.register_fluid(Fluid::Water, FlowingFluid::water())?;
    builder.register_fluid(Fluid::Lava, FlowingFluid::lava())?;
    Ok(())
}

/// A registry holding only the reference block set.
pub fn reference_registry() -> Registry {
    let mut builder = Registry::builder();
    register_reference_blocks(&mut builder).expect("reference block set is valid");
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_behavior::CapabilityKind;

    #[test]
    fn registers_every_name_once() {
        let registry = reference_registry();
        assert_eq!(registry.len(), ALL.len() + 1);
        for name in ALL {
            assert!(registry.id_of(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn registering_twice_fails() {
        let mut builder = Registry::builder();
        register_reference_blocks(&mut builder).unwrap();
        assert!(register_reference_blocks(&mut builder).is_err());
    }

    #[test]
    fn capabilities_match_block_roles() {
        let r = reference_registry();
        let id = |n| r.id_of(n).unwrap();
        assert!(r.implements(id(WHEAT), CapabilityKind::Growable));
        assert!(r.implements(id(SAND), CapabilityKind::Fallable));
        assert!(r.implements(id(LEVER), CapabilityKind::PowerSource));
        assert!(r.implements(id(OAK_SLAB), CapabilityKind::FluidContainer));
        assert!(r.implements(id(OAK_SLAB), CapabilityKind::FluidSource));
        assert!(r.implements(id(CUT_COPPER), CapabilityKind::ChangeOverTime));
        assert!(!r.implements(id(STONE), CapabilityKind::Growable));
        assert!(r.fluid_behavior(Fluid::Water).is_some());
        assert!(r.attributes(id(GRASS)).replaceable);
        assert!(r.attributes(id(OAK_SLAB)).solid);
    }
}
