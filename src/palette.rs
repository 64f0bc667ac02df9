use std::collections::HashMap;

use ratatui::style::Color;

use crate::engine::AnnotationId;

/// A translucent color in the form the highlight palettes are written in:
/// red/green/blue in `0..=255`, alpha in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Porter-Duff source-over: `self` rendered in front of `under`.
    pub fn over(self, under: Rgba) -> Rgba {
        let a = self.a + under.a * (1.0 - self.a);
        if a == 0.0 {
            return Rgba::TRANSPARENT;
        }
        Rgba {
            r: (self.r * self.a + under.r * under.a * (1.0 - self.a)) / a,
            g: (self.g * self.a + under.g * under.a * (1.0 - self.a)) / a,
            b: (self.b * self.a + under.b * under.a * (1.0 - self.a)) / a,
            a,
        }
    }

    /// Flatten against an opaque background. Terminal cells carry no alpha
    /// channel, so any remaining translucency is resolved here.
    pub fn blend_onto(self, background: (u8, u8, u8)) -> Color {
        let (br, bg, bb) = background;
        let r = self.r * self.a + f32::from(br) * (1.0 - self.a);
        let g = self.g * self.a + f32::from(bg) * (1.0 - self.a);
        let b = self.b * self.a + f32::from(bb) * (1.0 - self.a);
        Color::Rgb(r.round() as u8, g.round() as u8, b.round() as u8)
    }
}

pub const PALETTE_SLOTS: usize = 8;

pub(crate) const NORMAL_PALETTE: [Rgba; PALETTE_SLOTS] = [
    Rgba::new(100.0, 200.0, 255.0, 0.466), // blue
    Rgba::new(255.0, 150.0, 100.0, 0.466), // orange
    Rgba::new(200.0, 255.0, 100.0, 0.466), // lime
    Rgba::new(255.0, 100.0, 200.0, 0.466), // pink
    Rgba::new(255.0, 200.0, 100.0, 0.466), // peach
    Rgba::new(150.0, 200.0, 255.0, 0.466), // light blue
    Rgba::new(200.0, 100.0, 255.0, 0.466), // purple
    Rgba::new(100.0, 255.0, 200.0, 0.466), // cyan
];

pub(crate) const HOVER_PALETTE: [Rgba; PALETTE_SLOTS] = [
    Rgba::new(78.0, 117.0, 129.0, 0.86),  // dark blue
    Rgba::new(200.0, 100.0, 50.0, 0.86),  // dark orange
    Rgba::new(150.0, 200.0, 50.0, 0.86),  // dark lime
    Rgba::new(200.0, 100.0, 150.0, 0.86), // dark pink
    Rgba::new(200.0, 150.0, 50.0, 0.86),  // dark peach
    Rgba::new(100.0, 150.0, 200.0, 0.86), // dark light blue
    Rgba::new(150.0, 100.0, 200.0, 0.86), // dark purple
    Rgba::new(100.0, 200.0, 150.0, 0.86), // dark cyan
];

/// One-way mapping from annotation id to a fixed (normal, hover) color pair.
///
/// Slots are handed out in first-seen order and wrap around once both
/// palettes are exhausted; an id keeps its slot for the life of the session,
/// so a given annotation always renders in the same base color.
#[derive(Debug, Default)]
pub struct PaletteMap {
    slots: HashMap<AnnotationId, usize>,
    next_slot: usize,
}

impl PaletteMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, id: &AnnotationId) -> usize {
        if let Some(&slot) = self.slots.get(id) {
            return slot;
        }
        let slot = self.next_slot % PALETTE_SLOTS;
        self.next_slot += 1;
        self.slots.insert(id.clone(), slot);
        slot
    }

    /// Resolve an id to its assigned color. An unknown id is assigned the
    /// next free slot; this is the only side effect the palette has.
    pub fn color_for(&mut self, id: &AnnotationId, hovered: bool) -> Rgba {
        let slot = self.slot(id);
        if hovered {
            HOVER_PALETTE[slot]
        } else {
            NORMAL_PALETTE[slot]
        }
    }

    /// Composite color of a region covered by `ids`, combined left to right
    /// with each later id rendered on top of the accumulated result. The
    /// blend is deliberately non-commutative: the most recently applied mark
    /// wins visually at the seam. An empty id list has no color.
    pub fn composite<F>(&mut self, ids: &[AnnotationId], mut hover_of: F) -> Option<Rgba>
    where
        F: FnMut(&AnnotationId) -> bool,
    {
        let mut result: Option<Rgba> = None;
        for id in ids {
            let top = self.color_for(id, hover_of(id));
            result = Some(match result {
                Some(under) => top.over(under),
                None => top,
            });
        }
        result
    }
}

#[cfg(test)]
#[path = "palette_tests.rs"]
mod palette_tests;
