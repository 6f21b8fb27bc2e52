//! ARGB colors and the known-color palette.
//!
//! A [`Color`] is a packed 32-bit ARGB value with an optional
//! [`KnownColor`] tag remembering which named color it came from. Equality
//! and hashing look at the ARGB value only, so `Color::from_known(Red)`
//! equals `Color::from_rgb(255, 0, 0)`.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::error::{Error, Result};

// ============================================================================
// Known colors
// ============================================================================

macro_rules! known_colors {
    (
        system { $($sys:ident = $sys_argb:expr,)* }
        web { $($web:ident = $web_argb:expr,)* }
    ) => {
        /// Named colors: desktop system colors followed by web colors.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KnownColor {
            $($sys,)*
            $($web,)*
        }

        impl KnownColor {
            /// Every known color, system colors first.
            pub const ALL: &'static [KnownColor] = &[
                $(KnownColor::$sys,)*
                $(KnownColor::$web,)*
            ];

            pub fn name(self) -> &'static str {
                match self {
                    $(KnownColor::$sys => stringify!($sys),)*
                    $(KnownColor::$web => stringify!($web),)*
                }
            }

            /// Packed ARGB value from the process palette.
            pub fn argb(self) -> u32 {
                match self {
                    $(KnownColor::$sys => $sys_argb,)*
                    $(KnownColor::$web => $web_argb,)*
                }
            }

            pub fn is_system(self) -> bool {
                matches!(self, $(KnownColor::$sys)|*)
            }
        }
    };
}

known_colors! {
    system {
        ActiveBorder = 0xFFD4_D0C8,
        ActiveCaption = 0xFF00_54E3,
        ActiveCaptionText = 0xFFFF_FFFF,
        AppWorkspace = 0xFF80_8080,
        Control = 0xFFEC_E9D8,
        ControlDark = 0xFFAC_A899,
        ControlDarkDark = 0xFF71_6F64,
        ControlLight = 0xFFF1_EFE2,
        ControlLightLight = 0xFFFF_FFFF,
        ControlText = 0xFF00_0000,
        Desktop = 0xFF00_4E98,
        GrayText = 0xFFAC_A899,
        Highlight = 0xFF31_6AC5,
        HighlightText = 0xFFFF_FFFF,
        HotTrack = 0xFF00_0080,
        InactiveBorder = 0xFFD4_D0C8,
        InactiveCaption = 0xFF7A_96DF,
        InactiveCaptionText = 0xFFD8_E4F8,
        Info = 0xFFFF_FFE1,
        InfoText = 0xFF00_0000,
        Menu = 0xFFFF_FFFF,
        MenuText = 0xFF00_0000,
        ScrollBar = 0xFFD4_D0C8,
        Window = 0xFFFF_FFFF,
        WindowFrame = 0xFF00_0000,
        WindowText = 0xFF00_0000,
    }
    web {
        Transparent = 0x00FF_FFFF,
        AliceBlue = 0xFFF0_F8FF,
        AntiqueWhite = 0xFFFA_EBD7,
        Aqua = 0xFF00_FFFF,
        Aquamarine = 0xFF7F_FFD4,
        Azure = 0xFFF0_FFFF,
        Beige = 0xFFF5_F5DC,
        Bisque = 0xFFFF_E4C4,
        Black = 0xFF00_0000,
        BlanchedAlmond = 0xFFFF_EBCD,
        Blue = 0xFF00_00FF,
        BlueViolet = 0xFF8A_2BE2,
        Brown = 0xFFA5_2A2A,
        BurlyWood = 0xFFDE_B887,
        CadetBlue = 0xFF5F_9EA0,
        Chartreuse = 0xFF7F_FF00,
        Chocolate = 0xFFD2_691E,
        Coral = 0xFFFF_7F50,
        CornflowerBlue = 0xFF64_95ED,
        Cornsilk = 0xFFFF_F8DC,
        Crimson = 0xFFDC_143C,
        Cyan = 0xFF00_FFFF,
        DarkBlue = 0xFF00_008B,
        DarkCyan = 0xFF00_8B8B,
        DarkGoldenrod = 0xFFB8_860B,
        DarkGray = 0xFFA9_A9A9,
        DarkGreen = 0xFF00_6400,
        DarkKhaki = 0xFFBD_B76B,
        DarkMagenta = 0xFF8B_008B,
        DarkOliveGreen = 0xFF55_6B2F,
        DarkOrange = 0xFFFF_8C00,
        DarkOrchid = 0xFF99_32CC,
        DarkRed = 0xFF8B_0000,
        DarkSalmon = 0xFFE9_967A,
        DarkSeaGreen = 0xFF8F_BC8B,
        DarkSlateBlue = 0xFF48_3D8B,
        DarkSlateGray = 0xFF2F_4F4F,
        DarkTurquoise = 0xFF00_CED1,
        DarkViolet = 0xFF94_00D3,
        DeepPink = 0xFFFF_1493,
        DeepSkyBlue = 0xFF00_BFFF,
        DimGray = 0xFF69_6969,
        DodgerBlue = 0xFF1E_90FF,
        Firebrick = 0xFFB2_2222,
        FloralWhite = 0xFFFF_FAF0,
        ForestGreen = 0xFF22_8B22,
        Fuchsia = 0xFFFF_00FF,
        Gainsboro = 0xFFDC_DCDC,
        GhostWhite = 0xFFF8_F8FF,
        Gold = 0xFFFF_D700,
        Goldenrod = 0xFFDA_A520,
        Gray = 0xFF80_8080,
        Green = 0xFF00_8000,
        GreenYellow = 0xFFAD_FF2F,
        Honeydew = 0xFFF0_FFF0,
        HotPink = 0xFFFF_69B4,
        IndianRed = 0xFFCD_5C5C,
        Indigo = 0xFF4B_0082,
        Ivory = 0xFFFF_FFF0,
        Khaki = 0xFFF0_E68C,
        Lavender = 0xFFE6_E6FA,
        LavenderBlush = 0xFFFF_F0F5,
        LawnGreen = 0xFF7C_FC00,
        LemonChiffon = 0xFFFF_FACD,
        LightBlue = 0xFFAD_D8E6,
        LightCoral = 0xFFF0_8080,
        LightCyan = 0xFFE0_FFFF,
        LightGoldenrodYellow = 0xFFFA_FAD2,
        LightGray = 0xFFD3_D3D3,
        LightGreen = 0xFF90_EE90,
        LightPink = 0xFFFF_B6C1,
        LightSalmon = 0xFFFF_A07A,
        LightSeaGreen = 0xFF20_B2AA,
        LightSkyBlue = 0xFF87_CEFA,
        LightSlateGray = 0xFF77_8899,
        LightSteelBlue = 0xFFB0_C4DE,
        LightYellow = 0xFFFF_FFE0,
        Lime = 0xFF00_FF00,
        LimeGreen = 0xFF32_CD32,
        Linen = 0xFFFA_F0E6,
        Magenta = 0xFFFF_00FF,
        Maroon = 0xFF80_0000,
        MediumAquamarine = 0xFF66_CDAA,
        MediumBlue = 0xFF00_00CD,
        MediumOrchid = 0xFFBA_55D3,
        MediumPurple = 0xFF93_70DB,
        MediumSeaGreen = 0xFF3C_B371,
        MediumSlateBlue = 0xFF7B_68EE,
        MediumSpringGreen = 0xFF00_FA9A,
        MediumTurquoise = 0xFF48_D1CC,
        MediumVioletRed = 0xFFC7_1585,
        MidnightBlue = 0xFF19_1970,
        MintCream = 0xFFF5_FFFA,
        MistyRose = 0xFFFF_E4E1,
        Moccasin = 0xFFFF_E4B5,
        NavajoWhite = 0xFFFF_DEAD,
        Navy = 0xFF00_0080,
        OldLace = 0xFFFD_F5E6,
        Olive = 0xFF80_8000,
        OliveDrab = 0xFF6B_8E23,
        Orange = 0xFFFF_A500,
        OrangeRed = 0xFFFF_4500,
        Orchid = 0xFFDA_70D6,
        PaleGoldenrod = 0xFFEE_E8AA,
        PaleGreen = 0xFF98_FB98,
        PaleTurquoise = 0xFFAF_EEEE,
        PaleVioletRed = 0xFFDB_7093,
        PapayaWhip = 0xFFFF_EFD5,
        PeachPuff = 0xFFFF_DAB9,
        Peru = 0xFFCD_853F,
        Pink = 0xFFFF_C0CB,
        Plum = 0xFFDD_A0DD,
        PowderBlue = 0xFFB0_E0E6,
        Purple = 0xFF80_0080,
        Red = 0xFFFF_0000,
        RosyBrown = 0xFFBC_8F8F,
        RoyalBlue = 0xFF41_69E1,
        SaddleBrown = 0xFF8B_4513,
        Salmon = 0xFFFA_8072,
        SandyBrown = 0xFFF4_A460,
        SeaGreen = 0xFF2E_8B57,
        SeaShell = 0xFFFF_F5EE,
        Sienna = 0xFFA0_522D,
        Silver = 0xFFC0_C0C0,
        SkyBlue = 0xFF87_CEEB,
        SlateBlue = 0xFF6A_5ACD,
        SlateGray = 0xFF70_8090,
        Snow = 0xFFFF_FAFA,
        SpringGreen = 0xFF00_FF7F,
        SteelBlue = 0xFF46_82B4,
        Tan = 0xFFD2_B48C,
        Teal = 0xFF00_8080,
        Thistle = 0xFFD8_BFD8,
        Tomato = 0xFFFF_6347,
        Turquoise = 0xFF40_E0D0,
        Violet = 0xFFEE_82EE,
        Wheat = 0xFFF5_DEB3,
        White = 0xFFFF_FFFF,
        WhiteSmoke = 0xFFF5_F5F5,
        Yellow = 0xFFFF_FF00,
        YellowGreen = 0xFF9A_CD32,
    }
}

fn name_index() -> &'static HashMap<String, KnownColor> {
    static INDEX: OnceLock<HashMap<String, KnownColor>> = OnceLock::new();
    INDEX.get_or_init(|| {
        KnownColor::ALL
            .iter()
            .map(|k| (k.name().to_ascii_lowercase(), *k))
            .collect()
    })
}

// ============================================================================
// Color
// ============================================================================

/// 32-bit ARGB color, straight (not premultiplied) alpha.
#[derive(Clone, Copy)]
pub struct Color {
    argb: u32,
    known: Option<KnownColor>,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb(0x00FF_FFFF);
    pub const BLACK: Color = Color::from_argb(0xFF00_0000);
    pub const WHITE: Color = Color::from_argb(0xFFFF_FFFF);

    pub const fn from_argb(argb: u32) -> Self {
        Self { argb, known: None }
    }

    pub const fn from_rgba_components(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self::from_argb((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque color.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_components(255, r, g, b)
    }

    pub fn from_known(k: KnownColor) -> Self {
        Self {
            argb: k.argb(),
            known: Some(k),
        }
    }

    /// Case-insensitive lookup of a known color name.
    pub fn from_name(name: &str) -> Result<Self> {
        name_index()
            .get(&name.to_ascii_lowercase())
            .map(|k| Color::from_known(*k))
            .ok_or_else(|| Error::NotFound(format!("color '{name}'")))
    }

    pub fn a(&self) -> u8 {
        (self.argb >> 24) as u8
    }
    pub fn r(&self) -> u8 {
        (self.argb >> 16) as u8
    }
    pub fn g(&self) -> u8 {
        (self.argb >> 8) as u8
    }
    pub fn b(&self) -> u8 {
        self.argb as u8
    }

    pub fn to_argb(&self) -> u32 {
        self.argb
    }

    pub fn known_color(&self) -> Option<KnownColor> {
        self.known
    }

    /// Known name, or the ARGB value in lowercase hex.
    pub fn name(&self) -> String {
        match self.known {
            Some(k) => k.name().to_string(),
            None => format!("{:08x}", self.argb),
        }
    }

    pub fn is_known_color(&self) -> bool {
        self.known.is_some()
    }

    pub fn is_named_color(&self) -> bool {
        self.known.is_some()
    }

    pub fn is_system_color(&self) -> bool {
        self.known.is_some_and(|k| k.is_system())
    }

    /// HSL lightness in `[0, 1]`.
    pub fn brightness(&self) -> f64 {
        let (min, max) = self.min_max();
        (max + min) / 2.0
    }

    /// HSL saturation in `[0, 1]`.
    pub fn saturation(&self) -> f64 {
        let (min, max) = self.min_max();
        if max == min {
            return 0.0;
        }
        let l = (max + min) / 2.0;
        if l <= 0.5 {
            (max - min) / (max + min)
        } else {
            (max - min) / (2.0 - max - min)
        }
    }

    /// Hue in degrees, `[0, 360)`.
    pub fn hue(&self) -> f64 {
        if self.r() == self.g() && self.g() == self.b() {
            return 0.0;
        }
        let r = self.r() as f64 / 255.0;
        let g = self.g() as f64 / 255.0;
        let b = self.b() as f64 / 255.0;
        let (min, max) = self.min_max();
        let delta = max - min;
        let mut hue = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        hue *= 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }
        hue
    }

    fn min_max(&self) -> (f64, f64) {
        let r = self.r() as f64 / 255.0;
        let g = self.g() as f64 / 255.0;
        let b = self.b() as f64 / 255.0;
        (r.min(g).min(b), r.max(g).max(b))
    }

    pub fn with_alpha(&self, a: u8) -> Color {
        Color::from_rgba_components(a, self.r(), self.g(), self.b())
    }

    /// Component-wise interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * t).round() as u8;
        Color::from_rgba_components(
            mix(self.a(), other.a()),
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
        )
    }

    /// Source-over compositing of `self` onto `dst`.
    pub fn blend_over(&self, dst: &Color) -> Color {
        let sa = self.a() as f64 / 255.0;
        if sa >= 1.0 {
            return Color::from_argb(self.argb);
        }
        let da = dst.a() as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Color::from_argb(0);
        }
        let mix = |s: u8, d: u8| {
            ((s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Color::from_rgba_components(
            (out_a * 255.0).round() as u8,
            mix(self.r(), dst.r()),
            mix(self.g(), dst.g()),
            mix(self.b(), dst.b()),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::from_argb(0)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.argb == other.argb
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.argb.hash(state);
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color [{}]", self.name())?;
        if self.known.is_none() {
            write!(f, " A={} R={} G={} B={}", self.a(), self.r(), self.g(), self.b())?;
        }
        Ok(())
    }
}

impl From<KnownColor> for Color {
    fn from(k: KnownColor) -> Self {
        Color::from_known(k)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        let system = KnownColor::ALL.iter().filter(|k| k.is_system()).count();
        assert_eq!(system, 26);
        assert_eq!(KnownColor::ALL.len() - system, 141);
    }

    #[test]
    fn test_components() {
        let c = Color::from_rgba_components(0x80, 0x10, 0x20, 0x30);
        assert_eq!(c.a(), 0x80);
        assert_eq!(c.r(), 0x10);
        assert_eq!(c.g(), 0x20);
        assert_eq!(c.b(), 0x30);
        assert_eq!(c.to_argb(), 0x8010_2030);
    }

    #[test]
    fn test_equality_ignores_name() {
        let named = Color::from_known(KnownColor::Red);
        let plain = Color::from_rgb(255, 0, 0);
        assert_eq!(named, plain);
        assert!(named.is_known_color());
        assert!(!plain.is_known_color());
        assert_eq!(named.name(), "Red");
        assert_eq!(plain.name(), "ffff0000");
    }

    #[test]
    fn test_from_name() {
        let c = Color::from_name("cornflowerblue").unwrap();
        assert_eq!(c.known_color(), Some(KnownColor::CornflowerBlue));
        assert_eq!(c.to_argb(), 0xFF64_95ED);
        assert!(Color::from_name("WINDOWTEXT").unwrap().is_system_color());
        assert!(matches!(Color::from_name("notacolor"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_hsl() {
        let red = Color::from_rgb(255, 0, 0);
        assert_eq!(red.hue(), 0.0);
        assert!((red.saturation() - 1.0).abs() < 1e-12);
        assert!((red.brightness() - 0.5).abs() < 1e-12);
        let blue = Color::from_rgb(0, 0, 255);
        assert!((blue.hue() - 240.0).abs() < 1e-9);
        let gray = Color::from_rgb(128, 128, 128);
        assert_eq!(gray.saturation(), 0.0);
        assert_eq!(gray.hue(), 0.0);
    }

    #[test]
    fn test_lerp() {
        let c = Color::BLACK.lerp(&Color::WHITE, 0.5);
        assert_eq!(c.r(), 128);
        assert_eq!(c.a(), 255);
        assert_eq!(Color::BLACK.lerp(&Color::WHITE, 2.0), Color::WHITE);
    }

    #[test]
    fn test_blend_over() {
        let dst = Color::WHITE;
        assert_eq!(Color::BLACK.blend_over(&dst), Color::BLACK);
        let half = Color::BLACK.with_alpha(128);
        let out = half.blend_over(&dst);
        assert_eq!(out.a(), 255);
        assert!((out.r() as i32 - 127).abs() <= 1);
        assert_eq!(Color::TRANSPARENT.blend_over(&dst), dst);
    }
}
