//! The table of globals gridwarp binds, and the registry handler that
//! walks it.

use super::output::add_output;
use super::seat::add_seat;
use super::session::Session;
use crate::binder::{resolve, Action, GlobalDescriptor, GlobalKind, Slot};
use log::{debug, warn};
use wayland_client::protocol::wl_registry::{self, WlRegistry};
use wayland_client::{Connection, Dispatch, QueueHandle};

/// Constructor for a global that may be announced more than once.
pub(super) type Ctor = fn(&mut Session, &WlRegistry, u32, u32, &QueueHandle<Session>);

/// Every global gridwarp understands, sorted by interface name.
pub(super) const GLOBALS: &[GlobalDescriptor<Ctor>] = &[
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
    GlobalDescriptor {
        name: "zwlr_virtual_pointer_manager_v1",
        version: 2,
        kind: GlobalKind::Singleton(Slot::VirtualPointerManager),
    },
    GlobalDescriptor {
        name: "zxdg_output_manager_v1",
        version: 3,
        kind: GlobalKind::Singleton(Slot::OutputManager),
    },
];

impl Dispatch<WlRegistry, ()> for Session {
    fn event(
        state: &mut Self,
        registry: &WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => {
                match resolve(GLOBALS, &interface, version, |slot| state.is_bound(slot)) {
                    Action::Ignore => {}
                    Action::TooOld { need } => warn!(
                        "{} version {} is too old (need {}), ignoring",
                        interface, version, need
                    ),
                    Action::AlreadyBound(slot) => {
                        debug!("{} already bound, ignoring {} {}", slot, interface, name)
                    }
                    Action::Bind { slot, version } => {
                        debug!("binding {} v{}", interface, version);
                        state.bind_singleton(slot, registry, name, version, qh)
                    }
                    Action::Construct { ctor, version } => {
                        debug!("binding {} v{}", interface, version);
                        ctor(state, registry, name, version, qh)
                    }
                }
            }
            wl_registry::Event::GlobalRemove { name } => {
                debug!("global {} removed", name);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{find_global, is_sorted, missing_singleton};

    #[test]
    fn table_is_sorted() {
        assert!(is_sorted(GLOBALS));
    }

    #[test]
    fn every_entry_is_found() {
        for d in GLOBALS {
            assert_eq!(find_global(GLOBALS, d.name).map(|f| f.name), Some(d.name));
        }
        assert!(find_global(GLOBALS, "xdg_wm_base").is_none());
    }

    #[test]
    fn all_five_singletons_are_required() {
        let mut seen = Vec::new();
        assert_eq!(
            missing_singleton(GLOBALS, |slot| {
                seen.push(slot);
                true
            }),
            None
        );
        assert_eq!(seen.len(), 5);
        assert_eq!(
            missing_singleton(GLOBALS, |slot| slot != Slot::VirtualPointerManager),
            Some("zwlr_virtual_pointer_manager_v1")
        );
    }

    #[test]
    fn second_announcement_of_a_singleton_is_skipped() {
        for name in ["wl_compositor", "wl_shm", "zxdg_output_manager_v1"] {
            let first = resolve(GLOBALS, name, 99, |_| false);
            assert!(matches!(first, Action::Bind { .. }), "{}", name);
            let again = resolve(GLOBALS, name, 99, |_| true);
            assert!(matches!(again, Action::AlreadyBound(_)), "{}", name);
        }
    }

    #[test]
    fn outputs_and_seats_are_always_constructed() {
        for name in ["wl_output", "wl_seat"] {
            let action = resolve(GLOBALS, name, 99, |_| true);
            assert!(matches!(action, Action::Construct { .. }), "{}", name);
        }
    }

    #[test]
    fn old_layer_shell_is_rejected() {
        let action = resolve(GLOBALS, "zwlr_layer_shell_v1", 1, |_| false);
        assert!(matches!(action, Action::TooOld { need: 2 }));
    }
}
