//! Space trait compliance test helpers.
//!
//! These functions verify that a Space implementation satisfies the
//! invariants required by the trait contract. Reused across all backend
//! test modules.

use crate::space::Space;
use indexmap::IndexSet;

/// Assert that two calls to `canonical_ordering` return the same result.
pub fn assert_canonical_ordering_deterministic(space: &dyn Space) {
    let a = space.canonical_ordering();
    let b = space.canonical_ordering();
    assert_eq!(a, b, "canonical_ordering is non-deterministic");
}

/// Assert that `canonical_ordering` returns exactly `cell_count` unique,
/// addressable cells.
pub fn assert_canonical_ordering_complete(space: &dyn Space) {
    let ordering = space.canonical_ordering();
    assert_eq!(
        ordering.len(),
        space.cell_count(),
        "canonical_ordering length ({}) != cell_count ({})",
        ordering.len(),
        space.cell_count()
    );
    let unique: IndexSet<_> = ordering.iter().collect();
    assert_eq!(
        unique.len(),
        space.cell_count(),
        "canonical_ordering has duplicates"
    );
    assert!(ordering.iter().all(|&p| space.contains(p)));
}

/// Assert that `canonical_rank` inverts `canonical_ordering`.
pub fn assert_rank_matches_ordering(space: &dyn Space) {
    for (i, pos) in space.canonical_ordering().into_iter().enumerate() {
        assert_eq!(space.canonical_rank(pos), Some(i), "rank of {pos}");
    }
}

/// Assert that `sections()` is ascending and holds exactly the sections
/// of addressable cells.
pub fn assert_sections_cover_cells(space: &dyn Space) {
    let sections = space.sections();
    assert!(
        sections.windows(2).all(|w| w[0] < w[1]),
        "sections are not strictly ascending"
    );
    let from_cells: IndexSet<_> = space
        .canonical_ordering()
        .into_iter()
        .map(|p| p.section())
        .collect();
    assert_eq!(from_cells.len(), sections.len());
    assert!(sections.iter().all(|s| from_cells.contains(s)));
}

/// Run all compliance checks on a space.
pub fn run_full_compliance(space: &dyn Space) {
    assert_canonical_ordering_deterministic(space);
    assert_canonical_ordering_complete(space);
    assert_rank_matches_ordering(space);
    assert_sections_cover_cells(space);
}
