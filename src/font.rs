//! Font families and text as path geometry.
//!
//! Glyph metrics and outlines come from a [`FontMetricsProvider`]; the crate
//! does no shaping. Families are registered in a [`FontCollection`] and looked
//! up by case-insensitive name. [`Path::add_string`] lays glyph outlines out
//! left to right from a top-left origin.
//!
//! With the `font` feature, [`TtfFont`] reads TrueType and OpenType faces
//! through `ttf-parser`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ensure_finite, Error, Result};
use crate::geometry::PointF;
use crate::matrix::Matrix;
use crate::path::Path;

// ============================================================================
// Provider interface
// ============================================================================

/// Source of glyph metrics and outlines for one font family.
///
/// All values are in font design units with the y axis pointing up and the
/// baseline at `y = 0`.
pub trait FontMetricsProvider: Send + Sync + fmt::Debug {
    fn family_name(&self) -> &str;

    fn units_per_em(&self) -> u16;

    /// Distance from the baseline to the top of the cell.
    fn ascent(&self) -> f64;

    /// Distance from the baseline to the bottom of the cell, positive.
    fn descent(&self) -> f64;

    /// Baseline to baseline distance.
    fn line_spacing(&self) -> f64 {
        self.ascent() + self.descent()
    }

    fn advance_width(&self, ch: char) -> f64;

    /// Outline of `ch`, `None` for characters without ink.
    fn glyph_outline(&self, ch: char) -> Option<Path>;
}

// ============================================================================
// FontCollection / FontFamily
// ============================================================================

/// Registry of font families keyed by lowercase family name.
#[derive(Debug, Clone, Default)]
pub struct FontCollection {
    families: BTreeMap<String, Arc<dyn FontMetricsProvider>>,
}

impl FontCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its family name, replacing any family of
    /// the same name.
    pub fn add(&mut self, provider: Arc<dyn FontMetricsProvider>) {
        let key = provider.family_name().to_lowercase();
        self.families.insert(key, provider);
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> Vec<&str> {
        self.families.values().map(|p| p.family_name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FontMetricsProvider>> {
        self.families.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

/// A family resolved from a collection.
#[derive(Debug, Clone)]
pub struct FontFamily {
    provider: Arc<dyn FontMetricsProvider>,
}

impl FontFamily {
    pub fn new(provider: Arc<dyn FontMetricsProvider>) -> Self {
        Self { provider }
    }

    /// Look up `name` in `collection`.
    pub fn from_collection(collection: &FontCollection, name: &str) -> Result<Self> {
        collection
            .get(name)
            .cloned()
            .map(Self::new)
            .ok_or_else(|| Error::NotFound(format!("font family '{name}'")))
    }

    pub fn name(&self) -> &str {
        self.provider.family_name()
    }

    pub fn em_height(&self) -> u16 {
        self.provider.units_per_em()
    }

    pub fn cell_ascent(&self) -> f64 {
        self.provider.ascent()
    }

    pub fn cell_descent(&self) -> f64 {
        self.provider.descent()
    }

    pub fn line_spacing(&self) -> f64 {
        self.provider.line_spacing()
    }

    pub fn provider(&self) -> &dyn FontMetricsProvider {
        self.provider.as_ref()
    }
}

// ============================================================================
// Text layout
// ============================================================================

impl Path {
    /// Add the outlines of `text` set in `family` at `em_size` device units
    /// per em. `origin` is the top-left corner of the first line's cell; a
    /// `'\n'` starts the next line one line spacing lower. Other control
    /// characters are skipped.
    pub fn add_string(
        &mut self,
        text: &str,
        family: &FontFamily,
        em_size: f64,
        origin: PointF,
    ) -> Result<()> {
        ensure_finite("text origin", &[origin.x, origin.y])?;
        if !(em_size.is_finite() && em_size > 0.0) {
            return Err(Error::invalid(format!(
                "em size must be positive, got {em_size}"
            )));
        }
        let provider = family.provider();
        let units = provider.units_per_em();
        if units == 0 {
            return Err(Error::invalid(format!(
                "font family '{}' has zero units per em",
                provider.family_name()
            )));
        }
        let scale = em_size / units as f64;

        let mut pen_x = origin.x;
        let mut baseline = origin.y + provider.ascent() * scale;
        for ch in text.chars() {
            if ch == '\n' {
                pen_x = origin.x;
                baseline += provider.line_spacing() * scale;
                continue;
            }
            if ch.is_control() {
                continue;
            }
            if let Some(glyph) = provider.glyph_outline(ch) {
                let m = Matrix::new([scale, 0.0, 0.0, -scale, pen_x, baseline])?;
                self.start_figure();
                self.add_path(&glyph.transform(&m), false);
            }
            pen_x += provider.advance_width(ch) * scale;
        }
        self.start_figure();
        Ok(())
    }
}

// ============================================================================
// TrueType provider
// ============================================================================

#[cfg(feature = "font")]
pub use ttf::TtfFont;

#[cfg(feature = "font")]
mod ttf {
    use super::*;

    /// Font face parsed with `ttf-parser`.
    pub struct TtfFont {
        data: Vec<u8>,
        face_index: u32,
        family_name: String,
        units_per_em: u16,
        ascent: f64,
        descent: f64,
        line_gap: f64,
    }

    impl fmt::Debug for TtfFont {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("TtfFont")
                .field("family_name", &self.family_name)
                .field("face_index", &self.face_index)
                .field("units_per_em", &self.units_per_em)
                .finish()
        }
    }

    impl TtfFont {
        /// Parse face `face_index` of a font file (0 for single fonts).
        pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self> {
            let face = ttf_parser::Face::parse(&data, face_index)
                .map_err(|e| Error::invalid(format!("failed to parse font: {e:?}")))?;
            let family_name = face
                .names()
                .into_iter()
                .find(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
                .and_then(|n| n.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let units_per_em = face.units_per_em();
            let ascent = face.ascender() as f64;
            let descent = -(face.descender() as f64);
            let line_gap = face.line_gap() as f64;
            drop(face);
            Ok(Self {
                data,
                face_index,
                family_name,
                units_per_em,
                ascent,
                descent,
                line_gap,
            })
        }

        pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
            Self::from_data(std::fs::read(path)?, 0)
        }

        fn face(&self) -> Option<ttf_parser::Face<'_>> {
            ttf_parser::Face::parse(&self.data, self.face_index).ok()
        }
    }

    impl FontMetricsProvider for TtfFont {
        fn family_name(&self) -> &str {
            &self.family_name
        }

        fn units_per_em(&self) -> u16 {
            self.units_per_em
        }

        fn ascent(&self) -> f64 {
            self.ascent
        }

        fn descent(&self) -> f64 {
            self.descent
        }

        fn line_spacing(&self) -> f64 {
            self.ascent + self.descent + self.line_gap
        }

        fn advance_width(&self, ch: char) -> f64 {
            self.face()
                .and_then(|face| {
                    let id = face.glyph_index(ch)?;
                    face.glyph_hor_advance(id)
                })
                .map_or(0.0, |a| a as f64)
        }

        fn glyph_outline(&self, ch: char) -> Option<Path> {
            let face = self.face()?;
            let id = face.glyph_index(ch)?;
            let mut builder = OutlinePathBuilder::default();
            face.outline_glyph(id, &mut builder)?;
            if builder.failed {
                return None;
            }
            Some(builder.path)
        }
    }

    /// Builds a [`Path`] from `ttf-parser` outline commands.
    #[derive(Default)]
    struct OutlinePathBuilder {
        path: Path,
        current: PointF,
        failed: bool,
    }

    impl OutlinePathBuilder {
        fn check(&mut self, r: Result<()>) {
            if r.is_err() {
                self.failed = true;
            }
        }
    }

    fn pt(x: f32, y: f32) -> PointF {
        PointF::new(x as f64, y as f64)
    }

    impl ttf_parser::OutlineBuilder for OutlinePathBuilder {
        fn move_to(&mut self, x: f32, y: f32) {
            self.path.start_figure();
            self.current = pt(x, y);
        }

        fn line_to(&mut self, x: f32, y: f32) {
            let to = pt(x, y);
            let r = self.path.add_line(self.current, to);
            self.check(r);
            self.current = to;
        }

        fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
            let to = pt(x, y);
            let r = self.path.add_quadratic(self.current, pt(x1, y1), to);
            self.check(r);
            self.current = to;
        }

        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            let to = pt(x, y);
            let r = self.path.add_bezier(self.current, pt(x1, y1), pt(x2, y2), to);
            self.check(r);
            self.current = to;
        }

        fn close(&mut self) {
            self.path.close_figure();
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ttf_parser::OutlineBuilder;

        #[test]
        fn test_outline_builder_closes_figures() {
            let mut b = OutlinePathBuilder::default();
            b.move_to(0.0, 0.0);
            b.line_to(10.0, 0.0);
            b.quad_to(10.0, 10.0, 0.0, 10.0);
            b.close();
            b.move_to(20.0, 0.0);
            b.curve_to(21.0, 1.0, 22.0, 1.0, 23.0, 0.0);
            b.close();
            assert!(!b.failed);
            assert_eq!(b.path.figures().len(), 2);
            assert!(b.path.figures().iter().all(|f| f.is_closed()));
        }

        #[test]
        fn test_rejects_garbage() {
            assert!(matches!(
                TtfFont::from_data(vec![0u8; 16], 0),
                Err(Error::InvalidArgument(_))
            ));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 1000 units per em; every glyph advances 600 and 'I' is a bar.
    #[derive(Debug)]
    struct BoxFont;

    impl FontMetricsProvider for BoxFont {
        fn family_name(&self) -> &str {
            "Box Sans"
        }
        fn units_per_em(&self) -> u16 {
            1000
        }
        fn ascent(&self) -> f64 {
            800.0
        }
        fn descent(&self) -> f64 {
            200.0
        }
        fn advance_width(&self, _ch: char) -> f64 {
            600.0
        }
        fn glyph_outline(&self, ch: char) -> Option<Path> {
            if ch != 'I' {
                return None;
            }
            let mut p = Path::new();
            p.add_polygon(&[
                PointF::new(100.0, 0.0),
                PointF::new(500.0, 0.0),
                PointF::new(500.0, 700.0),
                PointF::new(100.0, 700.0),
            ])
            .unwrap();
            Some(p)
        }
    }

    fn family() -> FontFamily {
        let mut c = FontCollection::new();
        c.add(Arc::new(BoxFont));
        FontFamily::from_collection(&c, "box sans").unwrap()
    }

    fn assert_near(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_collection_lookup() {
        let mut c = FontCollection::new();
        assert!(c.is_empty());
        c.add(Arc::new(BoxFont));
        assert_eq!(c.families(), vec!["Box Sans"]);
        assert!(c.get("BOX SANS").is_some());
        assert!(matches!(
            FontFamily::from_collection(&c, "Courier"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_family_metrics() {
        let f = family();
        assert_eq!(f.name(), "Box Sans");
        assert_eq!(f.em_height(), 1000);
        assert_eq!(f.line_spacing(), 1000.0);
    }

    #[test]
    fn test_add_string_places_and_flips_glyphs() {
        let mut path = Path::new();
        path.add_string("II", &family(), 10.0, PointF::new(0.0, 0.0))
            .unwrap();
        assert_eq!(path.figures().len(), 2);
        // Baseline at 8; the bar spans y 1..8 and x 1..5, then 7..11.
        let b = path.get_bounds();
        assert_near(b.x, 1.0);
        assert_near(b.y, 1.0);
        assert_near(b.width, 10.0);
        assert_near(b.height, 7.0);
        assert!(path.is_visible(PointF::new(3.0, 7.5)));
        assert!(!path.is_visible(PointF::new(6.0, 4.0)));
    }

    #[test]
    fn test_space_advances_without_ink() {
        let mut path = Path::new();
        path.add_string(" I", &family(), 10.0, PointF::new(2.0, 0.0))
            .unwrap();
        assert_eq!(path.figures().len(), 1);
        assert_near(path.get_bounds().x, 9.0);
    }

    #[test]
    fn test_newline_moves_down_one_line() {
        let mut path = Path::new();
        path.add_string("I\nI", &family(), 10.0, PointF::new(0.0, 0.0))
            .unwrap();
        let b = path.get_bounds();
        assert_near(b.x, 1.0);
        assert_near(b.width, 4.0);
        assert_near(b.bottom(), 18.0);
    }

    #[test]
    fn test_rejects_bad_em_size() {
        let mut path = Path::new();
        assert!(path.add_string("I", &family(), 0.0, PointF::new(0.0, 0.0)).is_err());
        assert!(path
            .add_string("I", &family(), f64::NAN, PointF::new(0.0, 0.0))
            .is_err());
        assert!(path.is_empty());
    }
}
