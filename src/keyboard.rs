//! Keymap tracking and key bindings.
//!
//! Each seat's [`Keyboard`] holds at most one compiled xkb keymap and its
//! state.  A new keymap from the compositor replaces the pair only after it
//! compiled successfully, so a broken keymap never leaves the seat without a
//! usable state.
//!
//! A key press is matched as a [`KeyCombo`]: the effective modifiers plus
//! the key's *base* keysym, the one it produces with no modifiers held.
//! Matching on the base keysym keeps Caps Lock from turning `h` into `H`;
//! Shift is only ever seen as a modifier.
//!
//! [`Bindings`] maps combos to the [`Command`]s they run, parsed from
//! strings such as `"h"`, `"shift+h"`, `"H"` or `"ctrl+Return"`.

use crate::command::Command;
use log::{debug, warn};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use xkbcommon::xkb;

/// Offset between evdev key codes (as sent by `wl_keyboard.key`) and xkb
/// key codes.
const EVDEV_OFFSET: u32 = 8;

/// Errors from compiling a keymap.
#[derive(Debug, thiserror::Error)]
pub enum KeymapError {
    #[error("keymap is not valid utf-8")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("keymap failed to compile")]
    Compile,
    #[error("keymap io error: {0}")]
    Io(#[from] std::io::Error),
}

//  Modifiers

/// A set of the eight xkb real modifiers.
///
/// Bit `n` is the real modifier with xkb index `n`, so the mask lines up
/// with the one the compositor serializes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mods(u8);

impl Mods {
    pub const NONE: Mods = Mods(0);
    pub const SHIFT: Mods = Mods(1 << 0);
    pub const CAPS: Mods = Mods(1 << 1);
    pub const CTRL: Mods = Mods(1 << 2);
    pub const ALT: Mods = Mods(1 << 3);
    pub const NUM: Mods = Mods(1 << 4);
    pub const MOD3: Mods = Mods(1 << 5);
    pub const LOGO: Mods = Mods(1 << 6);
    pub const MOD5: Mods = Mods(1 << 7);

    /// Lock modifiers, ignored when no binding names them.
    pub const LOCKS: Mods = Mods(Self::CAPS.0 | Self::NUM.0);

    /// Config names, sorted for binary search.
    const BY_NAME: [(&'static str, Mods); 10] = [
        ("alt", Mods::ALT),
        ("caps", Mods::CAPS),
        ("control", Mods::CTRL),
        ("ctrl", Mods::CTRL),
        ("logo", Mods::LOGO),
        ("mod3", Mods::MOD3),
        ("mod5", Mods::MOD5),
        ("num", Mods::NUM),
        ("shift", Mods::SHIFT),
        ("super", Mods::LOGO),
    ];

    /// xkb names of the real modifiers, with their display names, in bit
    /// order.
    const REAL: [(&'static str, &'static str, Mods); 8] = [
        ("Shift", "shift", Mods::SHIFT),
        ("Lock", "caps", Mods::CAPS),
        ("Control", "ctrl", Mods::CTRL),
        ("Mod1", "alt", Mods::ALT),
        ("Mod2", "num", Mods::NUM),
        ("Mod3", "mod3", Mods::MOD3),
        ("Mod4", "logo", Mods::LOGO),
        ("Mod5", "mod5", Mods::MOD5),
    ];

    /// Parse a single modifier name, ignoring ASCII case.
    pub fn one_from_str(s: &str) -> Option<Mods> {
        let lower = s.to_ascii_lowercase();
        Self::BY_NAME
            .binary_search_by(|&(name, _)| name.cmp(lower.as_str()))
            .ok()
            .map(|i| Self::BY_NAME[i].1)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Mods) -> bool {
        self.0 & other.0 == other.0
    }

    /// `self` with every modifier in `other` removed.
    pub fn without(self, other: Mods) -> Mods {
        Mods(self.0 & !other.0)
    }
}

impl BitOr for Mods {
    type Output = Mods;

    fn bitor(self, rhs: Mods) -> Mods {
        Mods(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mods {
    fn bitor_assign(&mut self, rhs: Mods) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for &(_, name, m) in &Self::REAL {
            if self.contains(m) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

//  Keyboard

struct Compiled {
    keymap: xkb::Keymap,
    state: xkb::State,
}

/// The compiled keymap and modifier state of one seat.
#[derive(Default)]
pub struct Keyboard {
    compiled: Option<Compiled>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a keymap has been loaded.
    pub fn has_keymap(&self) -> bool {
        self.compiled.is_some()
    }

    /// Compile `text` (xkb text format v1) and make it the current keymap.
    ///
    /// Trailing NUL bytes, as sent by compositors, are ignored.  On failure
    /// the previous keymap and state stay in place.
    pub fn load_keymap(&mut self, context: &xkb::Context, text: &str) -> Result<(), KeymapError> {
        let text = text.trim_end_matches('\0');
        let keymap = xkb::Keymap::new_from_string(
            context,
            text.to_owned(),
            xkb::KEYMAP_FORMAT_TEXT_V1,
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or(KeymapError::Compile)?;
        let state = xkb::State::new(&keymap);
        if self.compiled.is_some() {
            debug!("replacing keymap");
        }
        self.compiled = Some(Compiled { keymap, state });
        Ok(())
    }

    /// Apply a `wl_keyboard.modifiers` event.
    pub fn update_modifiers(&mut self, depressed: u32, latched: u32, locked: u32, group: u32) {
        match self.compiled.as_mut() {
            Some(c) => {
                c.state.update_mask(depressed, latched, locked, 0, 0, group);
            }
            None => warn!("modifiers before keymap, ignoring"),
        }
    }

    /// The effective real modifiers.
    pub fn mods(&self) -> Mods {
        let Some(c) = self.compiled.as_ref() else {
            return Mods::NONE;
        };
        Mods::REAL
            .iter()
            .filter(|&&(xkb_name, _, _)| {
                c.state
                    .mod_name_is_active(xkb_name, xkb::STATE_MODS_EFFECTIVE)
            })
            .fold(Mods::NONE, |acc, &(_, _, m)| acc | m)
    }

    /// The keysym an evdev key code produces on the first shift level of
    /// its active layout.
    ///
    /// Returns `None` before a keymap has been loaded or when the key
    /// produces no symbol.
    pub fn base_keysym(&self, key: u32) -> Option<xkb::Keysym> {
        let c = self.compiled.as_ref()?;
        let code = xkb::Keycode::new(key + EVDEV_OFFSET);
        let layout = c.state.key_get_layout(code);
        if layout == xkb::LAYOUT_INVALID {
            return None;
        }
        c.keymap
            .key_get_syms_by_level(code, layout, 0)
            .first()
            .copied()
            .filter(|sym| sym.raw() != xkb::keysyms::KEY_NoSymbol)
    }

    /// The combo a press of `key` makes under the current modifiers.
    pub fn key(&self, key: u32) -> Option<KeyCombo> {
        let sym = self.base_keysym(key)?;
        Some(KeyCombo::new(self.mods(), sym))
    }
}

//  Key combos

/// Errors from parsing a binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("binding {0:?} has no key")]
    NoKey(String),
    #[error("binding {0:?} has more than one key")]
    TooManyKeys(String),
    #[error("binding {binding:?} repeats modifier {modifier:?}")]
    DuplicateModifier { binding: String, modifier: String },
    #[error("binding {binding:?}: unknown key {key:?}")]
    UnknownKey { binding: String, key: String },
    #[error("binding {0:?} has no commands")]
    NoCommands(String),
    #[error("{0} is bound more than once")]
    Duplicate(KeyCombo),
}

/// A modifier set plus a base keysym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub mods: Mods,
    pub sym: xkb::Keysym,
}

impl KeyCombo {
    pub fn new(mods: Mods, sym: xkb::Keysym) -> Self {
        Self { mods, sym }
    }

    /// A combo with no modifiers.
    pub fn plain(raw: u32) -> Self {
        Self::new(Mods::NONE, xkb::Keysym::new(raw))
    }

    /// Parse `mod+mod+key`.
    ///
    /// Modifier names are case-insensitive.  A single uppercase letter is
    /// read as Shift plus the lowercase letter, so `"H"` and `"shift+h"`
    /// are the same combo.  Other key names are xkb keysym names, matched
    /// exactly first and then ignoring case.
    pub fn parse(s: &str) -> Result<KeyCombo, BindingError> {
        let mut mods = Mods::NONE;
        let mut shifted = false;
        let mut sym = None;
        for element in s.split('+') {
            if let Some(m) = Mods::one_from_str(element) {
                if mods.contains(m) {
                    return Err(BindingError::DuplicateModifier {
                        binding: s.to_string(),
                        modifier: element.to_string(),
                    });
                }
                mods |= m;
                continue;
            }
            if sym.is_some() {
                return Err(BindingError::TooManyKeys(s.to_string()));
            }
            let (shift, parsed) = parse_key(element).ok_or_else(|| BindingError::UnknownKey {
                binding: s.to_string(),
                key: element.to_string(),
            })?;
            shifted = shift;
            sym = Some(parsed);
        }
        let sym = sym.ok_or_else(|| BindingError::NoKey(s.to_string()))?;
        if shifted {
            mods |= Mods::SHIFT;
        }
        Ok(KeyCombo { mods, sym })
    }
}

fn parse_key(name: &str) -> Option<(bool, xkb::Keysym)> {
    if name.is_empty() {
        return None;
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() {
            let lower = c.to_ascii_lowercase().to_string();
            return keysym(&lower, xkb::KEYSYM_NO_FLAGS).map(|sym| (true, sym));
        }
    }
    keysym(name, xkb::KEYSYM_NO_FLAGS)
        .or_else(|| keysym(name, xkb::KEYSYM_CASE_INSENSITIVE))
        .map(|sym| (false, sym))
}

fn keysym(name: &str, flags: xkb::KeysymFlags) -> Option<xkb::Keysym> {
    let sym = xkb::keysym_from_name(name, flags);
    (sym.raw() != xkb::keysyms::KEY_NoSymbol).then_some(sym)
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{}+", self.mods)?;
        }
        f.write_str(&xkb::keysym_get_name(self.sym))
    }
}

//  Bindings

/// Key combos and the commands they run, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    by_combo: HashMap<KeyCombo, Vec<Command>>,
}

impl Bindings {
    pub fn new(by_combo: HashMap<KeyCombo, Vec<Command>>) -> Self {
        Self { by_combo }
    }

    /// Build bindings from `(combo string, commands)` pairs.
    ///
    /// Fails on an unparseable combo, an empty command list, or two
    /// strings naming the same combo (`"H"` and `"shift+h"`).
    pub fn from_names<I, S>(entries: I) -> Result<Self, BindingError>
    where
        I: IntoIterator<Item = (S, Vec<Command>)>,
        S: AsRef<str>,
    {
        let mut by_combo = HashMap::new();
        for (name, cmds) in entries {
            let name = name.as_ref();
            let combo = KeyCombo::parse(name)?;
            if cmds.is_empty() {
                return Err(BindingError::NoCommands(name.to_string()));
            }
            if by_combo.insert(combo, cmds).is_some() {
                return Err(BindingError::Duplicate(combo));
            }
        }
        Ok(Self { by_combo })
    }

    /// The commands bound to exactly `combo`.
    pub fn get(&self, combo: &KeyCombo) -> Option<&[Command]> {
        self.by_combo.get(combo).map(Vec::as_slice)
    }

    /// The commands a key press runs.
    ///
    /// An exact match wins; otherwise Caps Lock and Num Lock are dropped
    /// from the modifiers and the lookup is retried.
    pub fn lookup(&self, combo: KeyCombo) -> Option<&[Command]> {
        self.get(&combo).or_else(|| {
            let unlocked = KeyCombo::new(combo.mods.without(Mods::LOCKS), combo.sym);
            if unlocked == combo {
                None
            } else {
                self.get(&unlocked)
            }
        })
    }

    pub fn len(&self) -> usize {
        self.by_combo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_combo.is_empty()
    }
}

/// One command or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum Commands {
    One(Command),
    Many(Vec<Command>),
}

impl<'de> Deserialize<'de> for Bindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, Commands>::deserialize(deserializer)?;
        Bindings::from_names(raw.into_iter().map(|(name, cmds)| {
            let cmds = match cmds {
                Commands::One(cmd) => vec![cmd],
                Commands::Many(cmds) => cmds,
            };
            (name, cmds)
        }))
        .map_err(DeError::custom)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Button, Direction};
    use xkb::keysyms::{KEY_Escape, KEY_Return, KEY_h};

    /// A self-contained keymap with no includes, so tests do not depend on
    /// the system's xkeyboard-config data.
    const TEST_KEYMAP: &str = r#"xkb_keymap {
    xkb_keycodes "test" {
        minimum = 8;
        maximum = 255;
        <ESC>  = 9;
        <RTRN> = 36;
        <AC06> = 43;
        <LFSH> = 50;
        <CAPS> = 66;
    };
    xkb_types "test" {
        type "ONE_LEVEL" {
            modifiers = none;
            level_name[Level1] = "Any";
        };
        type "ALPHABETIC" {
            modifiers = Shift+Lock;
            map[Shift] = Level2;
            map[Lock] = Level2;
            level_name[Level1] = "Base";
            level_name[Level2] = "Caps";
        };
    };
    xkb_compatibility "test" {
        interpret Shift_L {
            action = SetMods(modifiers = Shift);
        };
        interpret Caps_Lock {
            action = LockMods(modifiers = Lock);
        };
    };
    xkb_symbols "test" {
        key <ESC>  { type = "ONE_LEVEL", [ Escape ] };
        key <RTRN> { type = "ONE_LEVEL", [ Return ] };
        key <AC06> { type = "ALPHABETIC", [ h, H ] };
        key <LFSH> { type = "ONE_LEVEL", [ Shift_L ] };
        key <CAPS> { type = "ONE_LEVEL", [ Caps_Lock ] };
        modifier_map Shift { <LFSH> };
        modifier_map Lock { <CAPS> };
    };
};
"#;

    // evdev codes: xkb code minus 8.
    const KEY_ESC: u32 = 1;
    const KEY_ENTER: u32 = 28;
    const KEY_H: u32 = 35;

    // Serialized real-modifier masks.
    const SHIFT: u32 = 1 << 0;
    const LOCK: u32 = 1 << 1;

    fn context() -> xkb::Context {
        xkb::Context::new(xkb::CONTEXT_NO_FLAGS)
    }

    fn loaded() -> Keyboard {
        let mut kb = Keyboard::new();
        kb.load_keymap(&context(), TEST_KEYMAP).unwrap();
        kb
    }

    fn name(sym: Option<xkb::Keysym>) -> Option<String> {
        sym.map(xkb::keysym_get_name)
    }

    fn combo(s: &str) -> KeyCombo {
        KeyCombo::parse(s).unwrap()
    }

    fn vim_bindings() -> Bindings {
        Bindings::from_names([
            ("h", vec![Command::Cut(Direction::Left)]),
            ("H", vec![Command::Move(Direction::Left)]),
            ("Return", vec![Command::Click(Button::Left)]),
        ])
        .unwrap()
    }

    #[test]
    fn no_keysym_before_keymap() {
        let kb = Keyboard::new();
        assert!(!kb.has_keymap());
        assert!(kb.base_keysym(KEY_H).is_none());
        assert!(kb.key(KEY_H).is_none());
        assert_eq!(kb.mods(), Mods::NONE);
    }

    #[test]
    fn translates_plain_keys() {
        let kb = loaded();
        assert_eq!(name(kb.base_keysym(KEY_ESC)).as_deref(), Some("Escape"));
        assert_eq!(name(kb.base_keysym(KEY_ENTER)).as_deref(), Some("Return"));
        assert_eq!(name(kb.base_keysym(KEY_H)).as_deref(), Some("h"));
    }

    #[test]
    fn shift_is_a_modifier_not_a_level() {
        let mut kb = loaded();
        kb.update_modifiers(SHIFT, 0, 0, 0);
        assert_eq!(kb.mods(), Mods::SHIFT);
        assert_eq!(kb.key(KEY_H), Some(KeyCombo::new(Mods::SHIFT, xkb::Keysym::new(KEY_h))));
        kb.update_modifiers(0, 0, 0, 0);
        assert_eq!(kb.key(KEY_H), Some(KeyCombo::plain(KEY_h)));
    }

    #[test]
    fn caps_lock_keeps_base_keysym() {
        let mut kb = loaded();
        kb.update_modifiers(0, 0, LOCK, 0);
        assert_eq!(kb.mods(), Mods::CAPS);
        assert_eq!(name(kb.base_keysym(KEY_H)).as_deref(), Some("h"));
    }

    #[test]
    fn caps_lock_does_not_turn_cut_into_move() {
        let mut kb = loaded();
        let bindings = vim_bindings();

        kb.update_modifiers(0, 0, LOCK, 0);
        assert_eq!(
            bindings.lookup(kb.key(KEY_H).unwrap()),
            Some(&[Command::Cut(Direction::Left)][..])
        );

        kb.update_modifiers(SHIFT, 0, LOCK, 0);
        assert_eq!(
            bindings.lookup(kb.key(KEY_H).unwrap()),
            Some(&[Command::Move(Direction::Left)][..])
        );

        kb.update_modifiers(SHIFT, 0, 0, 0);
        assert_eq!(
            bindings.lookup(kb.key(KEY_H).unwrap()),
            Some(&[Command::Move(Direction::Left)][..])
        );
    }

    #[test]
    fn explicit_caps_binding_wins() {
        let mut kb = loaded();
        let bindings = Bindings::from_names([
            ("h", vec![Command::Cut(Direction::Left)]),
            ("caps+h", vec![Command::Quit]),
        ])
        .unwrap();
        kb.update_modifiers(0, 0, LOCK, 0);
        assert_eq!(bindings.lookup(kb.key(KEY_H).unwrap()), Some(&[Command::Quit][..]));
    }

    #[test]
    fn unbound_modifier_does_not_match() {
        let bindings = vim_bindings();
        let ctrl_h = KeyCombo::new(Mods::CTRL, xkb::Keysym::new(KEY_h));
        assert_eq!(bindings.lookup(ctrl_h), None);
        assert_eq!(bindings.lookup(KeyCombo::plain(KEY_Escape)), None);
    }

    #[test]
    fn trailing_nul_is_ignored() {
        let mut kb = Keyboard::new();
        let text = format!("{}\0", TEST_KEYMAP);
        kb.load_keymap(&context(), &text).unwrap();
        assert!(kb.has_keymap());
    }

    #[test]
    fn failed_compile_keeps_previous_keymap() {
        let mut kb = loaded();
        let err = kb.load_keymap(&context(), "xkb_keymap { this is not a keymap").unwrap_err();
        assert!(matches!(err, KeymapError::Compile));
        assert_eq!(name(kb.base_keysym(KEY_H)).as_deref(), Some("h"));
    }

    #[test]
    fn unmapped_key_has_no_keysym() {
        let kb = loaded();
        // evdev 30 (KEY_A) is not in the test keymap.
        assert!(kb.base_keysym(30).is_none());
    }

    #[test]
    fn modifiers_before_keymap_are_ignored() {
        let mut kb = Keyboard::new();
        kb.update_modifiers(SHIFT, 0, 0, 0);
        assert!(!kb.has_keymap());
    }

    #[test]
    fn one_modifier_from_str() {
        #[track_caller]
        fn check(s: &str, expected: Option<Mods>) {
            assert_eq!(Mods::one_from_str(s), expected);
        }

        check("alt", Some(Mods::ALT));
        check("ALT", Some(Mods::ALT));
        check("Ctrl", Some(Mods::CTRL));
        check("control", Some(Mods::CTRL));
        check("super", Some(Mods::LOGO));
        check("Shift", Some(Mods::SHIFT));
        check("caps", Some(Mods::CAPS));
        check("num", Some(Mods::NUM));
        check("mod3", Some(Mods::MOD3));
        check("mod5", Some(Mods::MOD5));
        check("logo", Some(Mods::LOGO));
        check("alt-", None);
        check("none", None);
        check("", None);
    }

    #[test]
    fn parse_combos() {
        assert_eq!(combo("h"), KeyCombo::plain(KEY_h));
        assert_eq!(combo("ctrl+h"), KeyCombo::new(Mods::CTRL, xkb::Keysym::new(KEY_h)));
        assert_eq!(
            combo("Ctrl+Shift+Return"),
            KeyCombo::new(Mods::CTRL | Mods::SHIFT, xkb::Keysym::new(KEY_Return))
        );
        assert_eq!(combo("H"), combo("shift+h"));
        assert_eq!(combo("shift+H"), combo("shift+h"));
        assert_eq!(combo("H+shift"), combo("shift+h"));
        assert_eq!(combo("return"), KeyCombo::plain(KEY_Return));
    }

    #[test]
    fn parse_rejects_bad_combos() {
        assert_eq!(
            KeyCombo::parse("ctrl+shift"),
            Err(BindingError::NoKey("ctrl+shift".into()))
        );
        assert_eq!(
            KeyCombo::parse("h+j"),
            Err(BindingError::TooManyKeys("h+j".into()))
        );
        assert!(matches!(
            KeyCombo::parse("ctrl+Ctrl+h"),
            Err(BindingError::DuplicateModifier { .. })
        ));
        assert!(matches!(
            KeyCombo::parse("ctrl+"),
            Err(BindingError::UnknownKey { .. })
        ));
        assert!(matches!(
            KeyCombo::parse("no_such_key"),
            Err(BindingError::UnknownKey { .. })
        ));
    }

    #[test]
    fn combo_display() {
        assert_eq!(combo("h").to_string(), "h");
        assert_eq!(combo("shift+ctrl+h").to_string(), "shift+ctrl+h");
        assert_eq!(combo("super+Escape").to_string(), "logo+Escape");
    }

    #[test]
    fn duplicate_combo_rejected() {
        let err = Bindings::from_names([
            ("H", vec![Command::Quit]),
            ("shift+h", vec![Command::Undo]),
        ])
        .unwrap_err();
        assert_eq!(err, BindingError::Duplicate(combo("shift+h")));
    }

    #[test]
    fn empty_command_list_rejected() {
        let err = Bindings::from_names([("h", Vec::new())]).unwrap_err();
        assert_eq!(err, BindingError::NoCommands("h".into()));
    }

    #[test]
    fn binding_runs_several_commands() {
        let bindings = Bindings::from_names([(
            "space",
            vec![Command::Cut(Direction::Left), Command::Click(Button::Left)],
        )])
        .unwrap();
        assert_eq!(
            bindings.lookup(combo("space")),
            Some(&[Command::Cut(Direction::Left), Command::Click(Button::Left)][..])
        );
    }

    #[test]
    fn deserialize_single_and_list() {
        let bindings: Bindings = serde_json::from_str(
            r#"{ "ctrl+j": "scroll-down", "space": ["cut-up", "left-click"] }"#,
        )
        .unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(
            bindings.get(&combo("ctrl+j")),
            Some(&[Command::Scroll(Direction::Down)][..])
        );
        assert_eq!(
            bindings.get(&combo("space")),
            Some(&[Command::Cut(Direction::Up), Command::Click(Button::Left)][..])
        );
    }

    #[test]
    fn deserialize_rejects_bad_entries() {
        assert!(serde_json::from_str::<Bindings>(r#"{ "h": "cut-sideways" }"#).is_err());
        assert!(serde_json::from_str::<Bindings>(r#"{ "hyper+h": "quit" }"#).is_err());
        assert!(serde_json::from_str::<Bindings>(r#"{ "h": [] }"#).is_err());
    }
}
