use super::session::Session;
use crate::keyboard::{Keyboard, KeymapError};
use log::{debug, warn};
use memmap2::MmapOptions;
use std::fs::File;
use std::os::fd::OwnedFd;
use wayland_client::protocol::wl_keyboard::{self, KeyState, KeymapFormat, WlKeyboard};
use wayland_client::protocol::wl_registry::WlRegistry;
use wayland_client::protocol::wl_seat::{self, Capability, WlSeat};
use wayland_client::{Connection, Dispatch, QueueHandle, WEnum};

/// Index of a seat in [`Session::seats`].  Seats live for the whole
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SeatId(pub(super) usize);

/// An announced seat and its keyboard, once it has one.
pub(super) struct Seat {
    // Kept so the seat proxy lives as long as its keyboard.
    _wl: WlSeat,
    keyboard: Option<WlKeyboard>,
    pub(super) state: Keyboard,
}

/// Repeatable constructor for `wl_seat`.
pub(super) fn add_seat(
    state: &mut Session,
    registry: &WlRegistry,
    name: u32,
    version: u32,
    qh: &QueueHandle<Session>,
) {
    let id = SeatId(state.seats.len());
    let wl = registry.bind(name, version, qh, id);
    state.seats.push(Seat {
        _wl: wl,
        keyboard: None,
        state: Keyboard::new(),
    });
}

/// Map the keymap the compositor sent and return it as text.
fn read_keymap(fd: OwnedFd, size: u32) -> Result<String, KeymapError> {
    let file = File::from(fd);
    // SAFETY: the compositor hands over a private read-only mapping source;
    // a copy-on-write mapping is never written through.
    let map = unsafe { MmapOptions::new().len(size as usize).map_copy_read_only(&file)? };
    Ok(std::str::from_utf8(&map)?.to_owned())
}

impl Session {
    fn load_keymap(&mut self, seat: SeatId, fd: OwnedFd, size: u32) {
        let Some(entry) = self.seats.get_mut(seat.0) else {
            return;
        };
        let result =
            read_keymap(fd, size).and_then(|text| entry.state.load_keymap(&self.xkb, &text));
        match result {
            Ok(()) => debug!("seat {} keymap loaded", seat.0),
            Err(e) => warn!("seat {}: {}", seat.0, e),
        }
    }
}

impl Dispatch<WlSeat, SeatId> for Session {
    fn event(
        state: &mut Self,
        seat: &WlSeat,
        event: wl_seat::Event,
        id: &SeatId,
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_seat::Event::Capabilities {
            capabilities: WEnum::Value(capabilities),
        } = event
        else {
            return;
        };
        let Some(entry) = state.seats.get_mut(id.0) else {
            return;
        };
        if capabilities.contains(Capability::Keyboard) && entry.keyboard.is_none() {
            debug!("seat {} has a keyboard", id.0);
            entry.keyboard = Some(seat.get_keyboard(qh, *id));
        }
    }
}

impl Dispatch<WlKeyboard, SeatId> for Session {
    fn event(
        state: &mut Self,
        _: &WlKeyboard,
        event: wl_keyboard::Event,
        id: &SeatId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_keyboard::Event::Keymap { format, fd, size } => match format {
                WEnum::Value(KeymapFormat::XkbV1) => state.load_keymap(*id, fd, size),
                other => warn!("seat {}: unsupported keymap format {:?}", id.0, other),
            },
            wl_keyboard::Event::Modifiers {
                mods_depressed,
                mods_latched,
                mods_locked,
                group,
                ..
            } => {
                if let Some(entry) = state.seats.get_mut(id.0) {
                    entry
                        .state
                        .update_modifiers(mods_depressed, mods_latched, mods_locked, group);
                }
            }
            wl_keyboard::Event::Key {
                key,
                state: WEnum::Value(KeyState::Pressed),
                ..
            } => state.key_pressed(*id, key),
            _ => {}
        }
    }
}
