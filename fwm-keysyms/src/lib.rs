//! Keysym enum for use when resolving key bindings to X keycodes.
//!
//! Trimmed from the full `X11/keysymdef.h` table to the subset actually
//! reachable from `keys/<modifier>_<sym>` bindings: letters, digits, the
//! common punctuation row, function keys, navigation keys and the
//! modifier keysyms themselves. Extending this table is a matter of
//! adding a variant here and its value in `as_u32`.
use strum::*;

/// A named X keysym.
#[allow(non_camel_case_types)]
#[derive(AsRefStr, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum XKeySym {
    /// XK_BackSpace
    #[strum(serialize = "BackSpace")]
    XK_BackSpace,
    /// XK_Tab
    #[strum(serialize = "Tab")]
    XK_Tab,
    /// XK_Return
    #[strum(serialize = "Return")]
    XK_Return,
    /// XK_Escape
    #[strum(serialize = "Escape")]
    XK_Escape,
    /// XK_Delete
    #[strum(serialize = "Delete")]
    XK_Delete,
    /// XK_Home
    #[strum(serialize = "Home")]
    XK_Home,
    /// XK_Left
    #[strum(serialize = "Left")]
    XK_Left,
    /// XK_Up
    #[strum(serialize = "Up")]
    XK_Up,
    /// XK_Right
    #[strum(serialize = "Right")]
    XK_Right,
    /// XK_Down
    #[strum(serialize = "Down")]
    XK_Down,
    /// XK_Page_Up
    #[strum(serialize = "Page_Up")]
    XK_Page_Up,
    /// XK_Page_Down
    #[strum(serialize = "Page_Down")]
    XK_Page_Down,
    /// XK_End
    #[strum(serialize = "End")]
    XK_End,
    /// XK_space
    #[strum(serialize = "space")]
    XK_space,
    /// XK_F1
    #[strum(serialize = "F1")]
    XK_F1,
    /// XK_F2
    #[strum(serialize = "F2")]
    XK_F2,
    /// XK_F3
    #[strum(serialize = "F3")]
    XK_F3,
    /// XK_F4
    #[strum(serialize = "F4")]
    XK_F4,
    /// XK_F5
    #[strum(serialize = "F5")]
    XK_F5,
    /// XK_F6
    #[strum(serialize = "F6")]
    XK_F6,
    /// XK_F7
    #[strum(serialize = "F7")]
    XK_F7,
    /// XK_F8
    #[strum(serialize = "F8")]
    XK_F8,
    /// XK_F9
    #[strum(serialize = "F9")]
    XK_F9,
    /// XK_F10
    #[strum(serialize = "F10")]
    XK_F10,
    /// XK_F11
    #[strum(serialize = "F11")]
    XK_F11,
    /// XK_F12
    #[strum(serialize = "F12")]
    XK_F12,
    /// XK_Shift_L
    #[strum(serialize = "Shift_L")]
    XK_Shift_L,
    /// XK_Shift_R
    #[strum(serialize = "Shift_R")]
    XK_Shift_R,
    /// XK_Control_L
    #[strum(serialize = "Control_L")]
    XK_Control_L,
    /// XK_Control_R
    #[strum(serialize = "Control_R")]
    XK_Control_R,
    /// XK_Caps_Lock
    #[strum(serialize = "Caps_Lock")]
    XK_Caps_Lock,
    /// XK_Alt_L
    #[strum(serialize = "Alt_L")]
    XK_Alt_L,
    /// XK_Alt_R
    #[strum(serialize = "Alt_R")]
    XK_Alt_R,
    /// XK_Super_L
    #[strum(serialize = "Super_L")]
    XK_Super_L,
    /// XK_Super_R
    #[strum(serialize = "Super_R")]
    XK_Super_R,
    /// XK_0
    #[strum(serialize = "0")]
    XK_0,
    /// XK_1
    #[strum(serialize = "1")]
    XK_1,
    /// XK_2
    #[strum(serialize = "2")]
    XK_2,
    /// XK_3
    #[strum(serialize = "3")]
    XK_3,
    /// XK_4
    #[strum(serialize = "4")]
    XK_4,
    /// XK_5
    #[strum(serialize = "5")]
    XK_5,
    /// XK_6
    #[strum(serialize = "6")]
    XK_6,
    /// XK_7
    #[strum(serialize = "7")]
    XK_7,
    /// XK_8
    #[strum(serialize = "8")]
    XK_8,
    /// XK_9
    #[strum(serialize = "9")]
    XK_9,
    /// XK_minus
    #[strum(serialize = "minus")]
    XK_minus,
    /// XK_equal
    #[strum(serialize = "equal")]
    XK_equal,
    /// XK_comma
    #[strum(serialize = "comma")]
    XK_comma,
    /// XK_period
    #[strum(serialize = "period")]
    XK_period,
    /// XK_slash
    #[strum(serialize = "slash")]
    XK_slash,
    /// XK_semicolon
    #[strum(serialize = "semicolon")]
    XK_semicolon,
    /// XK_apostrophe
    #[strum(serialize = "apostrophe")]
    XK_apostrophe,
    /// XK_grave
    #[strum(serialize = "grave")]
    XK_grave,
    /// XK_bracketleft
    #[strum(serialize = "bracketleft")]
    XK_bracketleft,
    /// XK_bracketright
    #[strum(serialize = "bracketright")]
    XK_bracketright,
    /// XK_backslash
    #[strum(serialize = "backslash")]
    XK_backslash,
    /// XK_a
    #[strum(serialize = "a")]
    XK_a,
    /// XK_b
    #[strum(serialize = "b")]
    XK_b,
    /// XK_c
    #[strum(serialize = "c")]
    XK_c,
    /// XK_d
    #[strum(serialize = "d")]
    XK_d,
    /// XK_e
    #[strum(serialize = "e")]
    XK_e,
    /// XK_f
    #[strum(serialize = "f")]
    XK_f,
    /// XK_g
    #[strum(serialize = "g")]
    XK_g,
    /// XK_h
    #[strum(serialize = "h")]
    XK_h,
    /// XK_i
    #[strum(serialize = "i")]
    XK_i,
    /// XK_j
    #[strum(serialize = "j")]
    XK_j,
    /// XK_k
    #[strum(serialize = "k")]
    XK_k,
    /// XK_l
    #[strum(serialize = "l")]
    XK_l,
    /// XK_m
    #[strum(serialize = "m")]
    XK_m,
    /// XK_n
    #[strum(serialize = "n")]
    XK_n,
    /// XK_o
    #[strum(serialize = "o")]
    XK_o,
    /// XK_p
    #[strum(serialize = "p")]
    XK_p,
    /// XK_q
    #[strum(serialize = "q")]
    XK_q,
    /// XK_r
    #[strum(serialize = "r")]
    XK_r,
    /// XK_s
    #[strum(serialize = "s")]
    XK_s,
    /// XK_t
    #[strum(serialize = "t")]
    XK_t,
    /// XK_u
    #[strum(serialize = "u")]
    XK_u,
    /// XK_v
    #[strum(serialize = "v")]
    XK_v,
    /// XK_w
    #[strum(serialize = "w")]
    XK_w,
    /// XK_x
    #[strum(serialize = "x")]
    XK_x,
    /// XK_y
    #[strum(serialize = "y")]
    XK_y,
    /// XK_z
    #[strum(serialize = "z")]
    XK_z,
}

impl XKeySym {
    /// The raw X keysym value for this key, as found in `X11/keysymdef.h`.
    pub fn as_u32(&self) -> u32 {
        match self {
            XKeySym::XK_BackSpace => 0xff08,
            XKeySym::XK_Tab => 0xff09,
            XKeySym::XK_Return => 0xff0d,
            XKeySym::XK_Escape => 0xff1b,
            XKeySym::XK_Delete => 0xffff,
            XKeySym::XK_Home => 0xff50,
            XKeySym::XK_Left => 0xff51,
            XKeySym::XK_Up => 0xff52,
            XKeySym::XK_Right => 0xff53,
            XKeySym::XK_Down => 0xff54,
            XKeySym::XK_Page_Up => 0xff55,
            XKeySym::XK_Page_Down => 0xff56,
            XKeySym::XK_End => 0xff57,
            XKeySym::XK_space => 0x0020,
            XKeySym::XK_F1 => 0xffbe,
            XKeySym::XK_F2 => 0xffbf,
            XKeySym::XK_F3 => 0xffc0,
            XKeySym::XK_F4 => 0xffc1,
            XKeySym::XK_F5 => 0xffc2,
            XKeySym::XK_F6 => 0xffc3,
            XKeySym::XK_F7 => 0xffc4,
            XKeySym::XK_F8 => 0xffc5,
            XKeySym::XK_F9 => 0xffc6,
            XKeySym::XK_F10 => 0xffc7,
            XKeySym::XK_F11 => 0xffc8,
            XKeySym::XK_F12 => 0xffc9,
            XKeySym::XK_Shift_L => 0xffe1,
            XKeySym::XK_Shift_R => 0xffe2,
            XKeySym::XK_Control_L => 0xffe3,
            XKeySym::XK_Control_R => 0xffe4,
            XKeySym::XK_Caps_Lock => 0xffe5,
            XKeySym::XK_Alt_L => 0xffe9,
            XKeySym::XK_Alt_R => 0xffea,
            XKeySym::XK_Super_L => 0xffeb,
            XKeySym::XK_Super_R => 0xffec,
            XKeySym::XK_0 => 0x0030,
            XKeySym::XK_1 => 0x0031,
            XKeySym::XK_2 => 0x0032,
            XKeySym::XK_3 => 0x0033,
            XKeySym::XK_4 => 0x0034,
            XKeySym::XK_5 => 0x0035,
            XKeySym::XK_6 => 0x0036,
            XKeySym::XK_7 => 0x0037,
            XKeySym::XK_8 => 0x0038,
            XKeySym::XK_9 => 0x0039,
            XKeySym::XK_minus => 0x002d,
            XKeySym::XK_equal => 0x003d,
            XKeySym::XK_comma => 0x002c,
            XKeySym::XK_period => 0x002e,
            XKeySym::XK_slash => 0x002f,
            XKeySym::XK_semicolon => 0x003b,
            XKeySym::XK_apostrophe => 0x0027,
            XKeySym::XK_grave => 0x0060,
            XKeySym::XK_bracketleft => 0x005b,
            XKeySym::XK_bracketright => 0x005d,
            XKeySym::XK_backslash => 0x005c,
            XKeySym::XK_a => 0x0061,
            XKeySym::XK_b => 0x0062,
            XKeySym::XK_c => 0x0063,
            XKeySym::XK_d => 0x0064,
            XKeySym::XK_e => 0x0065,
            XKeySym::XK_f => 0x0066,
            XKeySym::XK_g => 0x0067,
            XKeySym::XK_h => 0x0068,
            XKeySym::XK_i => 0x0069,
            XKeySym::XK_j => 0x006a,
            XKeySym::XK_k => 0x006b,
            XKeySym::XK_l => 0x006c,
            XKeySym::XK_m => 0x006d,
            XKeySym::XK_n => 0x006e,
            XKeySym::XK_o => 0x006f,
            XKeySym::XK_p => 0x0070,
            XKeySym::XK_q => 0x0071,
            XKeySym::XK_r => 0x0072,
            XKeySym::XK_s => 0x0073,
            XKeySym::XK_t => 0x0074,
            XKeySym::XK_u => 0x0075,
            XKeySym::XK_v => 0x0076,
            XKeySym::XK_w => 0x0077,
            XKeySym::XK_x => 0x0078,
            XKeySym::XK_y => 0x0079,
            XKeySym::XK_z => 0x007a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_name() {
        let sym = XKeySym::from_str("Return").unwrap();
        assert_eq!(sym, XKeySym::XK_Return);
        assert_eq!(sym.as_ref(), "Return");
    }

    #[test]
    fn letters_are_in_ascii_order() {
        assert_eq!(XKeySym::XK_a.as_u32() + 1, XKeySym::XK_b.as_u32());
    }
}
