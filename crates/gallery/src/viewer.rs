//! Full-screen viewer (lightbox) over the gallery's item list.
//!
//! Navigation is circular, so previous/next are defined for any non-empty list.

use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::Serialize;
use shared::domain::MediaKind;

use crate::GalleryItem;

/// Fraction of the viewport available to an image, as (width, height).
pub const IMAGE_VIEWPORT_FRACTION: (f64, f64) = (0.88, 0.88);
/// Fraction of the viewport available to a video, as (width, height).
pub const VIDEO_VIEWPORT_FRACTION: (f64, f64) = (0.88, 0.82);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Closed,
    Open(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" | "arrowleft" | "prev" => Ok(Self::ArrowLeft),
            "right" | "arrowright" | "next" => Ok(Self::ArrowRight),
            "esc" | "escape" => Ok(Self::Escape),
            "" => Err(anyhow!("empty key name")),
            _ => Ok(Self::Other),
        }
    }
}

/// Where a pointer click landed while the viewer is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Backdrop,
    Content,
    PreviousButton,
    NextButton,
    CloseButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn scaled(self, (fw, fh): (f64, f64)) -> Self {
        Self {
            width: (f64::from(self.width) * fw).round() as u32,
            height: (f64::from(self.height) * fh).round() as u32,
        }
    }
}

/// Scales `natural` down to fit inside `bounds`, preserving aspect ratio.
/// Media already inside the bounds keeps its natural size.
pub fn fit_within(natural: Size, bounds: Size) -> Size {
    if natural.width == 0 || natural.height == 0 {
        return Size::new(0, 0);
    }
    let scale_w = f64::from(bounds.width) / f64::from(natural.width);
    let scale_h = f64::from(bounds.height) / f64::from(natural.height);
    let scale = scale_w.min(scale_h).min(1.0);
    Size {
        width: (f64::from(natural.width) * scale).round() as u32,
        height: (f64::from(natural.height) * scale).round() as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    Image { max: Size },
    Video { max: Size, autoplay: bool, controls: bool },
}

impl Presentation {
    pub fn for_kind(kind: MediaKind, viewport: Size) -> Self {
        match kind {
            MediaKind::Image => Self::Image {
                max: viewport.scaled(IMAGE_VIEWPORT_FRACTION),
            },
            MediaKind::Video => Self::Video {
                max: viewport.scaled(VIDEO_VIEWPORT_FRACTION),
                autoplay: true,
                controls: true,
            },
        }
    }

    pub fn max(&self) -> Size {
        match self {
            Self::Image { max } | Self::Video { max, .. } => *max,
        }
    }

    /// On-screen size for media of the given natural dimensions.
    pub fn display_size(&self, natural: Size) -> Size {
        fit_within(natural, self.max())
    }
}

#[derive(Debug)]
pub struct Slide<'a> {
    pub index: usize,
    pub total: usize,
    pub item: &'a GalleryItem,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, Default)]
pub struct Viewer {
    state: ViewerState,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open(_))
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            ViewerState::Open(index) => Some(index),
            ViewerState::Closed => None,
        }
    }

    /// Opens at `index`. Out-of-range indices leave the state untouched.
    pub fn open(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.state = ViewerState::Open(index);
        true
    }

    pub fn close(&mut self) {
        self.state = ViewerState::Closed;
    }

    pub fn previous(&mut self, len: usize) {
        self.step(len, |index, len| (index + len - 1) % len);
    }

    pub fn next(&mut self, len: usize) {
        self.step(len, |index, len| (index + 1) % len);
    }

    fn step(&mut self, len: usize, advance: impl Fn(usize, usize) -> usize) {
        let ViewerState::Open(index) = self.state else {
            return;
        };
        if len == 0 {
            self.close();
            return;
        }
        self.state = ViewerState::Open(advance(index.min(len - 1), len));
    }

    /// Applies a key press. Keys are ignored while closed; returns whether the
    /// key was bound.
    pub fn handle_key(&mut self, key: Key, len: usize) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::ArrowLeft => self.previous(len),
            Key::ArrowRight => self.next(len),
            Key::Escape => self.close(),
            Key::Other => return false,
        }
        true
    }

    pub fn handle_pointer(&mut self, target: PointerTarget, len: usize) {
        if !self.is_open() {
            return;
        }
        match target {
            PointerTarget::Backdrop | PointerTarget::CloseButton => self.close(),
            PointerTarget::PreviousButton => self.previous(len),
            PointerTarget::NextButton => self.next(len),
            PointerTarget::Content => {}
        }
    }

    /// Re-clamps the open index after the item at `position` left the list.
    pub fn on_item_removed(&mut self, position: usize, new_len: usize) {
        let ViewerState::Open(index) = self.state else {
            return;
        };
        if new_len == 0 {
            self.close();
            return;
        }
        let index = if position < index { index - 1 } else { index };
        self.state = ViewerState::Open(index.min(new_len - 1));
    }

    pub fn slide<'a>(&self, items: &'a [GalleryItem], viewport: Size) -> Option<Slide<'a>> {
        let index = self.index()?;
        let item = items.get(index)?;
        Some(Slide {
            index,
            total: items.len(),
            item,
            presentation: Presentation::for_kind(item.kind, viewport),
        })
    }
}

#[cfg(test)]
#[path = "tests/viewer_tests.rs"]
mod tests;
