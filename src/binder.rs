//! Global discovery table.
//!
//! The compositor announces every global it supports by interface name and
//! version.  gridwarp keeps one sorted table of the interfaces it cares
//! about; each announcement is looked up by binary search and either bound
//! into a fixed singleton [`Slot`] or handed to the constructor of a
//! repeatable kind (outputs, seats).
//!
//! [`resolve`] makes that decision without touching the connection, so the
//! registry handler only carries out the [`Action`] it returns.

use std::cmp::Ordering;
use std::fmt;

/// Where a singleton global is stored once bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Compositor,
    Shm,
    LayerShell,
    VirtualPointerManager,
    OutputManager,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Compositor => write!(f, "compositor"),
            Slot::Shm => write!(f, "shared memory"),
            Slot::LayerShell => write!(f, "layer shell"),
            Slot::VirtualPointerManager => write!(f, "virtual pointer manager"),
            Slot::OutputManager => write!(f, "output manager"),
        }
    }
}

/// How an announced global is handled.
///
/// `C` is the constructor type for repeatable globals.
#[derive(Clone, Copy)]
pub enum GlobalKind<C> {
    /// Bound once into the given slot; later announcements are ignored.
    Singleton(Slot),
    /// Bound on every announcement; the constructor tracks the new entity.
    Repeatable(C),
}

impl<C> fmt::Debug for GlobalKind<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalKind::Singleton(slot) => f.debug_tuple("Singleton").field(slot).finish(),
            GlobalKind::Repeatable(_) => f.write_str("Repeatable"),
        }
    }
}

/// One row of the discovery table.
#[derive(Debug, Clone, Copy)]
pub struct GlobalDescriptor<C> {
    /// Interface name as announced by the compositor.
    pub name: &'static str,
    /// Version to bind; announcements below it are unusable.
    pub version: u32,
    pub kind: GlobalKind<C>,
}

/// Find the descriptor for `name` in a table sorted by name.
pub fn find_global<'a, C>(
    table: &'a [GlobalDescriptor<C>],
    name: &str,
) -> Option<&'a GlobalDescriptor<C>> {
    table
        .binary_search_by(|d| d.name.cmp(name))
        .ok()
        .map(|i| &table[i])
}

/// What to do with one registry announcement.
#[derive(Clone, Copy)]
pub enum Action<C> {
    /// Not an interface in the table.
    Ignore,
    /// Known, but announced below the version the table needs.
    TooOld { need: u32 },
    /// Bind a singleton into its empty slot at `version`.
    Bind { slot: Slot, version: u32 },
    /// A second announcement of a singleton that is already bound.
    AlreadyBound(Slot),
    /// Bind a repeatable global at `version` through its constructor.
    Construct { ctor: C, version: u32 },
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Ignore => f.write_str("Ignore"),
            Action::TooOld { need } => f.debug_struct("TooOld").field("need", need).finish(),
            Action::Bind { slot, version } => f
                .debug_struct("Bind")
                .field("slot", slot)
                .field("version", version)
                .finish(),
            Action::AlreadyBound(slot) => f.debug_tuple("AlreadyBound").field(slot).finish(),
            Action::Construct { version, .. } => f
                .debug_struct("Construct")
                .field("version", version)
                .finish(),
        }
    }
}

/// Decide how to handle the global `name` announced at `version`.
///
/// Globals are always bound at the table's version, never the announced
/// one.  `is_bound` is only asked about singletons.
pub fn resolve<C: Copy>(
    table: &[GlobalDescriptor<C>],
    name: &str,
    version: u32,
    is_bound: impl FnOnce(Slot) -> bool,
) -> Action<C> {
    let Some(desc) = find_global(table, name) else {
        return Action::Ignore;
    };
    if version < desc.version {
        return Action::TooOld { need: desc.version };
    }
    match desc.kind {
        GlobalKind::Singleton(slot) => {
            if is_bound(slot) {
                Action::AlreadyBound(slot)
            } else {
                Action::Bind {
                    slot,
                    version: desc.version,
                }
            }
        }
        GlobalKind::Repeatable(ctor) => Action::Construct {
            ctor,
            version: desc.version,
        },
    }
}

/// Whether `table` is strictly sorted by name, as [`find_global`] requires.
pub fn is_sorted<C>(table: &[GlobalDescriptor<C>]) -> bool {
    table
        .windows(2)
        .all(|w| w[0].name.cmp(w[1].name) == Ordering::Less)
}

/// Name of the first singleton in `table` that `is_bound` reports as
/// missing.
pub fn missing_singleton<C>(
    table: &[GlobalDescriptor<C>],
    mut is_bound: impl FnMut(Slot) -> bool,
) -> Option<&'static str> {
    table.iter().find_map(|d| match d.kind {
        GlobalKind::Singleton(slot) if !is_bound(slot) => Some(d.name),
        _ => None,
    })
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    type Ctor = fn(&mut Vec<&'static str>);

    fn add_output(log: &mut Vec<&'static str>) {
        log.push("output");
    }

    fn add_seat(log: &mut Vec<&'static str>) {
        log.push("seat");
    }

    const TABLE: &[GlobalDescriptor<Ctor>] = &[
        GlobalDescriptor {
            name: "wl_compositor",
            version: 4,
            kind: GlobalKind::Singleton(Slot::Compositor),
        },
        GlobalDescriptor {
            name: "wl_output",
            version: 3,
            kind: GlobalKind::Repeatable(add_output),
        },
        GlobalDescriptor {
            name: "wl_seat",
            version: 7,
            kind: GlobalKind::Repeatable(add_seat),
        },
        GlobalDescriptor {
            name: "wl_shm",
            version: 1,
            kind: GlobalKind::Singleton(Slot::Shm),
        },
        GlobalDescriptor {
            name: "zwlr_layer_shell_v1",
            version: 2,
            kind: GlobalKind::Singleton(Slot::LayerShell),
        },
    ];

    #[test]
    fn test_table_is_sorted() {
        assert!(is_sorted(TABLE));
    }

    #[test]
    fn unsorted_table_detected() {
        let mut rows = TABLE.to_vec();
        rows.swap(0, 3);
        assert!(!is_sorted(&rows));
    }

    #[test]
    fn every_entry_is_found_for_every_prefix() {
        for len in 0..=TABLE.len() {
            let table = &TABLE[..len];
            for d in table {
                let found = find_global(table, d.name).expect(d.name);
                assert_eq!(found.name, d.name);
                assert_eq!(found.version, d.version);
            }
            for d in &TABLE[len..] {
                assert!(find_global(table, d.name).is_none());
            }
        }
    }

    #[test]
    fn absent_names_are_not_found() {
        for name in ["", "a", "wl_", "wl_data_device_manager", "wl_shm_pool", "zzz", "xdg_wm_base"] {
            assert!(find_global(TABLE, name).is_none(), "{}", name);
        }
    }

    #[test]
    fn repeatable_constructor_is_invoked() {
        let mut log = Vec::new();
        for name in ["wl_seat", "wl_output", "wl_output"] {
            if let Some(GlobalDescriptor {
                kind: GlobalKind::Repeatable(ctor),
                ..
            }) = find_global(TABLE, name)
            {
                ctor(&mut log);
            }
        }
        assert_eq!(log, vec!["seat", "output", "output"]);
    }

    #[test]
    fn missing_singleton_reports_first_unbound() {
        assert_eq!(missing_singleton(TABLE, |_| true), None);
        assert_eq!(
            missing_singleton(TABLE, |s| s != Slot::Shm),
            Some("wl_shm")
        );
        assert_eq!(missing_singleton(TABLE, |_| false), Some("wl_compositor"));
    }

    #[test]
    fn slot_display() {
        assert_eq!(Slot::LayerShell.to_string(), "layer shell");
    }

    #[test]
    fn resolve_ignores_unknown_interfaces() {
        let action = resolve(TABLE, "xdg_wm_base", 5, |_| panic!("not a singleton"));
        assert!(matches!(action, Action::Ignore));
    }

    #[test]
    fn resolve_rejects_old_versions() {
        let action = resolve(TABLE, "wl_compositor", 3, |_| false);
        assert!(matches!(action, Action::TooOld { need: 4 }));
        let action = resolve(TABLE, "wl_seat", 6, |_| false);
        assert!(matches!(action, Action::TooOld { need: 7 }));
    }

    #[test]
    fn resolve_binds_singleton_at_table_version() {
        let action = resolve(TABLE, "wl_compositor", 6, |_| false);
        assert!(matches!(
            action,
            Action::Bind {
                slot: Slot::Compositor,
                version: 4
            }
        ));
    }

    #[test]
    fn resolve_skips_duplicate_singleton() {
        let mut bound = Vec::new();
        for _ in 0..2 {
            match resolve(TABLE, "wl_shm", 1, |slot| bound.contains(&slot)) {
                Action::Bind { slot, .. } => bound.push(slot),
                Action::AlreadyBound(slot) => assert_eq!(slot, Slot::Shm),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(bound, vec![Slot::Shm]);
    }

    #[test]
    fn resolve_constructs_every_repeatable() {
        let mut log = Vec::new();
        for name in ["wl_output", "wl_seat", "wl_output"] {
            match resolve(TABLE, name, 9, |_| true) {
                Action::Construct { ctor, version } => {
                    assert!(version == 3 || version == 7);
                    ctor(&mut log);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(log, vec!["output", "seat", "output"]);
    }
}
