//! Strongly-typed identifiers and grid geometry.

use std::fmt;

/// Identifies a block type within the block registry.
///
/// Types are registered at startup and assigned sequential IDs.
/// `BlockTypeId(0)` is always the empty block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockTypeId(pub u32);

impl BlockTypeId {
    /// The empty ("air") block type.
    pub const EMPTY: BlockTypeId = BlockTypeId(0);
}

impl fmt::Display for BlockTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BlockTypeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation advances one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick `delay` steps after this one, saturating at `u64::MAX`.
    pub fn after(self, delay: u64) -> TickId {
        TickId(self.0.saturating_add(delay))
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

// ── Direction ──────────────────────────────────────────────────────

/// One of the six face-adjacent directions of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Negative Y.
    Down,
    /// Positive Y.
    Up,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Negative X.
    West,
    /// Positive X.
    East,
}

impl Direction {
    /// All six directions in canonical update order.
    ///
    /// Neighbour notification always walks this order, which keeps
    /// cascades deterministic.
    pub const ALL: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
    ];

    /// The four horizontal directions.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Unit offset `(dx, dy, dz)` of this direction.
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// Whether this direction lies in the horizontal plane.
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        };
        f.write_str(name)
    }
}

// ── BlockPos ───────────────────────────────────────────────────────

/// Integer position of a cell in the world grid.
///
/// Ordering is lexicographic on `(x, y, z)` so collections keyed by
/// position iterate deterministically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl BlockPos {
    /// The origin cell.
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    /// Construct a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The face-adjacent cell in `dir`.
    pub fn relative(self, dir: Direction) -> BlockPos {
        self.relative_by(dir, 1)
    }

    /// The cell `distance` steps away in `dir`.
    pub fn relative_by(self, dir: Direction, distance: i32) -> BlockPos {
        let (dx, dy, dz) = dir.offset();
        BlockPos::new(
            self.x.wrapping_add(dx.wrapping_mul(distance)),
            self.y.wrapping_add(dy.wrapping_mul(distance)),
            self.z.wrapping_add(dz.wrapping_mul(distance)),
        )
    }

    /// Shorthand for `relative(Direction::Down)`.
    pub fn below(self) -> BlockPos {
        self.relative(Direction::Down)
    }

    /// Shorthand for `relative(Direction::Up)`.
    pub fn above(self) -> BlockPos {
        self.relative(Direction::Up)
    }

    /// Manhattan (L1) distance to `other`.
    pub fn manhattan(self, other: BlockPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }

    /// The section containing this cell.
    pub fn section(self) -> SectionPos {
        SectionPos::new(
            self.x.div_euclid(SectionPos::SIZE),
            self.y.div_euclid(SectionPos::SIZE),
            self.z.div_euclid(SectionPos::SIZE),
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

// ── SectionPos ─────────────────────────────────────────────────────

/// Position of a 16×16×16 aligned group of cells.
///
/// Sections are the unit of random-tick sampling and random-stream
/// scoping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionPos {
    /// Section index along X.
    pub x: i32,
    /// Section index along Y.
    pub y: i32,
    /// Section index along Z.
    pub z: i32,
}

impl SectionPos {
    /// Edge length of a section, in cells.
    pub const SIZE: i32 = 16;

    /// Number of cells in one section.
    pub const VOLUME: usize = (Self::SIZE * Self::SIZE * Self::SIZE) as usize;

    /// Construct a section position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The lowest-coordinate cell of this section.
    pub fn min_pos(self) -> BlockPos {
        BlockPos::new(
            self.x.wrapping_mul(Self::SIZE),
            self.y.wrapping_mul(Self::SIZE),
            self.z.wrapping_mul(Self::SIZE),
        )
    }

    /// The highest-coordinate cell of this section.
    pub fn max_pos(self) -> BlockPos {
        let min = self.min_pos();
        BlockPos::new(
            min.x + Self::SIZE - 1,
            min.y + Self::SIZE - 1,
            min.z + Self::SIZE - 1,
        )
    }

    /// Whether `pos` lies inside this section.
    pub fn contains(self, pos: BlockPos) -> bool {
        pos.section() == self
    }

    /// The cell at local offset `(lx, ly, lz)`, each in `0..SIZE`.
    pub fn cell(self, lx: i32, ly: i32, lz: i32) -> BlockPos {
        debug_assert!((0..Self::SIZE).contains(&lx));
        debug_assert!((0..Self::SIZE).contains(&ly));
        debug_assert!((0..Self::SIZE).contains(&lz));
        let min = self.min_pos();
        BlockPos::new(min.x + lx, min.y + ly, min.z + lz)
    }
}

impl fmt::Display for SectionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
