//! Pens: how a path outline is stroked.
//!
//! A [`Pen`] owns its [`Brush`], width, caps, join, miter limit and dash
//! settings. Dash lengths and the dash offset are measured in pen widths.
//! System pens returned by [`Pen::system`] are read-only; cloning one gives
//! a modifiable copy.

use tracing::warn;

use crate::brush::Brush;
use crate::color::{Color, KnownColor};
use crate::error::{ensure_finite, Error, Result};
use crate::geometry::PointF;

pub use crate::math_stroke::{LineCap, LineJoin};

/// Cap used at the inner ends of dashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashCap {
    #[default]
    Flat,
    Round,
    Triangle,
}

impl From<DashCap> for LineCap {
    fn from(c: DashCap) -> Self {
        match c {
            DashCap::Flat => LineCap::Flat,
            DashCap::Round => LineCap::Round,
            DashCap::Triangle => LineCap::Triangle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    /// Pattern set through [`Pen::set_dash_pattern`].
    Custom,
}

impl DashStyle {
    /// Preset pattern in pen widths; empty for solid and custom.
    pub fn pattern(self) -> &'static [f64] {
        match self {
            DashStyle::Solid | DashStyle::Custom => &[],
            DashStyle::Dash => &[3.0, 1.0],
            DashStyle::Dot => &[1.0, 1.0],
            DashStyle::DashDot => &[3.0, 1.0, 1.0, 1.0],
            DashStyle::DashDotDot => &[3.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Cap geometry supplied by the caller.
///
/// Points are in pen widths, with x across the stroke (negative toward the
/// left rail) and y pointing away from the line. They are inserted between
/// the two rail corners of the end they cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomLineCap {
    points: Vec<PointF>,
}

impl CustomLineCap {
    pub fn new(points: Vec<PointF>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::invalid("custom cap needs at least one point"));
        }
        if !points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
            return Err(Error::invalid("custom cap points must be finite"));
        }
        Ok(Self { points })
    }

    /// Arrow head `height` widths long and `width` widths across.
    pub fn arrow(width: f64, height: f64) -> Result<Self> {
        ensure_finite("arrow cap size", &[width, height])?;
        Self::new(vec![
            PointF::new(-width / 2.0, 0.0),
            PointF::new(0.0, height),
            PointF::new(width / 2.0, 0.0),
        ])
    }

    pub fn points(&self) -> &[PointF] {
        &self.points
    }
}

// ============================================================================
// Pen
// ============================================================================

#[derive(Debug)]
pub struct Pen {
    brush: Brush,
    width: f64,
    start_cap: LineCap,
    end_cap: LineCap,
    dash_cap: DashCap,
    line_join: LineJoin,
    miter_limit: f64,
    dash_style: DashStyle,
    dash_pattern: Vec<f64>,
    dash_offset: f64,
    custom_start_cap: Option<CustomLineCap>,
    custom_end_cap: Option<CustomLineCap>,
    modifiable: bool,
}

impl Clone for Pen {
    fn clone(&self) -> Self {
        Self {
            brush: self.brush.clone(),
            width: self.width,
            start_cap: self.start_cap,
            end_cap: self.end_cap,
            dash_cap: self.dash_cap,
            line_join: self.line_join,
            miter_limit: self.miter_limit,
            dash_style: self.dash_style,
            dash_pattern: self.dash_pattern.clone(),
            dash_offset: self.dash_offset,
            custom_start_cap: self.custom_start_cap.clone(),
            custom_end_cap: self.custom_end_cap.clone(),
            modifiable: true,
        }
    }
}

fn check_width(width: f64) -> Result<()> {
    if !(width.is_finite() && width >= 0.0) {
        return Err(Error::invalid(format!(
            "pen width must be non-negative, got {width}"
        )));
    }
    Ok(())
}

impl Pen {
    /// Solid-color pen. Width `0` draws hairlines.
    pub fn new(color: Color, width: f64) -> Result<Self> {
        Self::with_brush(Brush::Solid(color), width)
    }

    pub fn with_brush(brush: Brush, width: f64) -> Result<Self> {
        check_width(width)?;
        Ok(Self::base(brush, width))
    }

    /// Read-only one-unit pen in a known color.
    pub fn system(color: KnownColor) -> Self {
        Self {
            modifiable: false,
            ..Self::base(Brush::Solid(Color::from_known(color)), 1.0)
        }
    }

    fn base(brush: Brush, width: f64) -> Self {
        Self {
            brush,
            width,
            start_cap: LineCap::Flat,
            end_cap: LineCap::Flat,
            dash_cap: DashCap::Flat,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash_style: DashStyle::Solid,
            dash_pattern: Vec::new(),
            dash_offset: 0.0,
            custom_start_cap: None,
            custom_end_cap: None,
            modifiable: true,
        }
    }

    pub fn is_modifiable(&self) -> bool {
        self.modifiable
    }

    fn check_modifiable(&self) -> Result<()> {
        if self.modifiable {
            Ok(())
        } else {
            Err(Error::invalid("system pens cannot be modified"))
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn brush(&self) -> &Brush {
        &self.brush
    }
    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn start_cap(&self) -> LineCap {
        self.start_cap
    }
    pub fn end_cap(&self) -> LineCap {
        self.end_cap
    }
    pub fn dash_cap(&self) -> DashCap {
        self.dash_cap
    }
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }
    pub fn dash_style(&self) -> DashStyle {
        self.dash_style
    }
    pub fn dash_offset(&self) -> f64 {
        self.dash_offset
    }
    pub fn custom_start_cap(&self) -> Option<&CustomLineCap> {
        self.custom_start_cap.as_ref()
    }
    pub fn custom_end_cap(&self) -> Option<&CustomLineCap> {
        self.custom_end_cap.as_ref()
    }

    /// The pattern as set, or the preset of the dash style.
    pub fn dash_pattern(&self) -> &[f64] {
        match self.dash_style {
            DashStyle::Custom => &self.dash_pattern,
            style => style.pattern(),
        }
    }

    /// Pattern the stroker walks, in pen widths. `None` means solid: no
    /// pattern, or one whose entries are all zero. Odd-length patterns are
    /// repeated once so on and off alternate.
    pub fn effective_dashes(&self) -> Option<Vec<f64>> {
        let pattern = self.dash_pattern();
        if pattern.iter().all(|d| *d == 0.0) {
            if !pattern.is_empty() {
                warn!(len = pattern.len(), "all-zero dash pattern, stroking solid");
            }
            return None;
        }
        let mut dashes = pattern.to_vec();
        if dashes.len() % 2 == 1 {
            dashes.extend_from_slice(pattern);
        }
        Some(dashes)
    }

    /// Width actually stroked: zero-width pens use `hairline`.
    pub fn effective_width(&self, hairline: f64) -> f64 {
        if self.width == 0.0 {
            hairline
        } else {
            self.width
        }
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    pub fn set_brush(&mut self, brush: Brush) -> Result<()> {
        self.check_modifiable()?;
        self.brush = brush;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) -> Result<()> {
        self.set_brush(Brush::Solid(color))
    }

    pub fn set_width(&mut self, width: f64) -> Result<()> {
        self.check_modifiable()?;
        check_width(width)?;
        self.width = width;
        Ok(())
    }

    pub fn set_start_cap(&mut self, cap: LineCap) -> Result<()> {
        self.check_modifiable()?;
        self.start_cap = cap;
        Ok(())
    }

    pub fn set_end_cap(&mut self, cap: LineCap) -> Result<()> {
        self.check_modifiable()?;
        self.end_cap = cap;
        Ok(())
    }

    pub fn set_dash_cap(&mut self, cap: DashCap) -> Result<()> {
        self.check_modifiable()?;
        self.dash_cap = cap;
        Ok(())
    }

    /// Set start, end and dash caps together.
    pub fn set_line_cap(&mut self, start: LineCap, end: LineCap, dash: DashCap) -> Result<()> {
        self.check_modifiable()?;
        self.start_cap = start;
        self.end_cap = end;
        self.dash_cap = dash;
        Ok(())
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> Result<()> {
        self.check_modifiable()?;
        self.line_join = join;
        Ok(())
    }

    /// Largest miter tip distance in half-widths. Values up to 1 always
    /// bevel.
    pub fn set_miter_limit(&mut self, limit: f64) -> Result<()> {
        self.check_modifiable()?;
        if !(limit.is_finite() && limit >= 0.0) {
            return Err(Error::invalid(format!(
                "miter limit must be non-negative, got {limit}"
            )));
        }
        self.miter_limit = limit;
        Ok(())
    }

    /// Select a preset. `Custom` keeps the last custom pattern.
    pub fn set_dash_style(&mut self, style: DashStyle) -> Result<()> {
        self.check_modifiable()?;
        self.dash_style = style;
        Ok(())
    }

    /// Custom dash pattern in pen widths; switches the style to `Custom`.
    pub fn set_dash_pattern(&mut self, pattern: &[f64]) -> Result<()> {
        self.check_modifiable()?;
        if let Some(d) = pattern.iter().find(|d| !(d.is_finite() && **d >= 0.0)) {
            return Err(Error::invalid(format!(
                "dash entries must be non-negative, got {d}"
            )));
        }
        self.dash_pattern = pattern.to_vec();
        self.dash_style = DashStyle::Custom;
        Ok(())
    }

    pub fn set_dash_offset(&mut self, offset: f64) -> Result<()> {
        self.check_modifiable()?;
        ensure_finite("dash offset", &[offset])?;
        self.dash_offset = offset;
        Ok(())
    }

    /// Attach geometry for a custom start cap and select it.
    pub fn set_custom_start_cap(&mut self, cap: CustomLineCap) -> Result<()> {
        self.check_modifiable()?;
        self.custom_start_cap = Some(cap);
        self.start_cap = LineCap::Custom;
        Ok(())
    }

    pub fn set_custom_end_cap(&mut self, cap: CustomLineCap) -> Result<()> {
        self.check_modifiable()?;
        self.custom_end_cap = Some(cap);
        self.end_cap = LineCap::Custom;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let pen = Pen::new(Color::BLACK, 2.0).unwrap();
        assert_eq!(pen.width(), 2.0);
        assert_eq!(pen.start_cap(), LineCap::Flat);
        assert_eq!(pen.line_join(), LineJoin::Miter);
        assert_eq!(pen.miter_limit(), 10.0);
        assert_eq!(pen.dash_style(), DashStyle::Solid);
        assert!(pen.effective_dashes().is_none());
        assert!(pen.is_modifiable());
    }

    #[test]
    fn test_width_validation() {
        assert!(matches!(
            Pen::new(Color::BLACK, -1.0),
            Err(Error::InvalidArgument(_))
        ));
        let pen = Pen::new(Color::BLACK, 0.0).unwrap();
        assert_eq!(pen.effective_width(1.0), 1.0);
        assert_eq!(pen.effective_width(0.5), 0.5);
    }

    #[test]
    fn test_dash_patterns() {
        let mut pen = Pen::new(Color::BLACK, 1.0).unwrap();
        pen.set_dash_style(DashStyle::DashDot).unwrap();
        assert_eq!(pen.effective_dashes(), Some(vec![3.0, 1.0, 1.0, 1.0]));
        pen.set_dash_pattern(&[2.0, 1.0, 0.5]).unwrap();
        assert_eq!(pen.dash_style(), DashStyle::Custom);
        assert_eq!(
            pen.effective_dashes(),
            Some(vec![2.0, 1.0, 0.5, 2.0, 1.0, 0.5])
        );
        pen.set_dash_pattern(&[]).unwrap();
        assert!(pen.effective_dashes().is_none());
        pen.set_dash_pattern(&[0.0, 0.0]).unwrap();
        assert!(pen.effective_dashes().is_none());
        assert!(matches!(
            pen.set_dash_pattern(&[1.0, -1.0]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_system_pen_is_read_only() {
        let mut pen = Pen::system(KnownColor::WindowText);
        assert!(!pen.is_modifiable());
        assert!(pen.set_width(3.0).is_err());
        assert!(pen.set_color(Color::WHITE).is_err());
        assert!(pen.set_dash_style(DashStyle::Dot).is_err());
        assert_eq!(pen.width(), 1.0);
        let mut copy = pen.clone();
        assert!(copy.is_modifiable());
        copy.set_width(3.0).unwrap();
        assert_eq!(copy.width(), 3.0);
        assert_eq!(pen.width(), 1.0);
    }

    #[test]
    fn test_clone_owns_brush() {
        let pen = Pen::new(Color::BLACK, 1.0).unwrap();
        let mut copy = pen.clone();
        copy.set_color(Color::WHITE).unwrap();
        assert!(matches!(pen.brush(), Brush::Solid(c) if *c == Color::BLACK));
        assert!(matches!(copy.brush(), Brush::Solid(c) if *c == Color::WHITE));
    }

    #[test]
    fn test_custom_caps() {
        let mut pen = Pen::new(Color::BLACK, 1.0).unwrap();
        pen.set_custom_end_cap(CustomLineCap::arrow(2.0, 2.0).unwrap())
            .unwrap();
        assert_eq!(pen.end_cap(), LineCap::Custom);
        assert_eq!(pen.custom_end_cap().unwrap().points().len(), 3);
        assert!(CustomLineCap::new(Vec::new()).is_err());
    }
}
