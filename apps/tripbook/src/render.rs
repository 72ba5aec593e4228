//! Plain-text rendering of the itinerary page and gallery.

use std::fmt::Write as _;

use gallery::{GalleryController, Presentation, Slide};
use serde::Serialize;
use shared::{
    domain::MediaKind,
    itinerary::{Highlight, ItineraryDay},
};

pub fn render_itinerary(days: &[ItineraryDay], highlights: &[Highlight]) -> String {
    let mut out = String::new();
    if !highlights.is_empty() {
        let line: Vec<String> = highlights
            .iter()
            .map(|h| format!("{} {} ({})", h.icon, h.label, h.value))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ·  "));
        out.push('\n');
    }
    for day in days {
        let _ = writeln!(out, "{} Day {} · {}", day.emoji, day.day, day.title);
        for activity in day.activities {
            let _ = writeln!(out, "   • {activity}");
        }
        let meals: Vec<String> = day
            .meals
            .labelled()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();
        if !meals.is_empty() {
            let _ = writeln!(out, "   🍽  {}", meals.join(" | "));
        }
        if let Some(hotel) = day.hotel {
            let _ = writeln!(out, "   🏨 {hotel}");
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Serialize)]
pub struct ListedItem<'a> {
    pub index: usize,
    pub id: &'a str,
    pub name: &'a str,
    pub kind: MediaKind,
}

pub fn listed_items(gallery: &GalleryController) -> Vec<ListedItem<'_>> {
    gallery
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| ListedItem {
            index,
            id: item.id.as_str(),
            name: &item.name,
            kind: item.kind,
        })
        .collect()
}

pub fn render_gallery(gallery: &GalleryController) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} / {} items", gallery.len(), gallery.capacity());
    if !gallery.is_persistent() {
        out.push_str("(persistence unavailable; changes last for this session only)\n");
    }
    for item in listed_items(gallery) {
        let badge = match item.kind {
            MediaKind::Video => "🎬",
            MediaKind::Image => "🖼",
        };
        let _ = writeln!(out, "{:>4}  {badge} {}  [{}]", item.index, item.name, item.id);
    }
    out
}

pub fn render_slide(slide: &Slide<'_>) -> String {
    let detail = match slide.presentation {
        Presentation::Image { max } => format!("image fit within {}x{}", max.width, max.height),
        Presentation::Video {
            max,
            autoplay,
            controls,
        } => format!(
            "video within {}x{} (autoplay: {autoplay}, controls: {controls})",
            max.width, max.height
        ),
    };
    format!(
        "[{}/{}] {} · {} · {}",
        slide.index + 1,
        slide.total,
        slide.item.name,
        detail,
        slide.item.display().reference()
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
