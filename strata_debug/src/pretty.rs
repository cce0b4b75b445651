// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable layer dumps.
//!
//! The format follows the composer `dump` facility: a header line per
//! display, then one indented block per layer, bottom-most first.

use std::io::{self, Write};

use strata_core::fence::{NO_FENCE, RawFence};
use strata_core::geometry::Region;
use strata_core::layer::LayerStack;

use crate::snapshot::LayerSnapshot;

/// Writes every live layer of `stack` in z-order.
pub fn write_stack(stack: &LayerStack, out: &mut dyn Write) -> io::Result<()> {
    let order = stack.z_ordered();
    writeln!(
        out,
        "Display {:?}: {} layer{}",
        stack.display(),
        order.len(),
        if order.len() == 1 { "" } else { "s" },
    )?;
    for id in order {
        if let Ok(layer) = stack.get(id) {
            write_snapshot(&LayerSnapshot::capture(layer), out)?;
        }
    }
    Ok(())
}

/// Writes one layer block.
pub fn write_snapshot(s: &LayerSnapshot, out: &mut dyn Write) -> io::Result<()> {
    let validated = s
        .validated
        .map_or_else(|| "-".to_owned(), |v| format!("{v:?}"));
    writeln!(
        out,
        "  {:?} z={} type={:?} validated={validated}",
        s.id, s.z_order, s.composition_type,
    )?;

    let buffer = if s.has_buffer {
        format!("{:?}", s.format)
    } else {
        "none".to_owned()
    };
    writeln!(
        out,
        "    buffer={buffer} acquire={} release={} sideband={}",
        fence(s.acquire_fence),
        fence(s.release_fence),
        if s.has_sideband { "yes" } else { "no" },
    )?;
    writeln!(
        out,
        "    crop=[{:.1}, {:.1}, {:.1}, {:.1}] frame={:?} {}x{} tr={:#x} blend={:?}",
        s.source_crop.x0,
        s.source_crop.y0,
        s.source_crop.x1,
        s.source_crop.y1,
        s.display_frame,
        s.display_frame.width(),
        s.display_frame.height(),
        s.transform.bits(),
        s.blend_mode,
    )?;
    writeln!(
        out,
        "    alpha={} has_alpha={} color={:#010x}{} ds={:#x}",
        s.plane_alpha,
        s.has_alpha,
        s.color.to_argb(),
        if s.is_dim { " (dim)" } else { "" },
        s.dataspace.0,
    )?;
    writeln!(out, "    visible: {}", rects(&s.visible_region))?;
    writeln!(out, "    damage: {}", rects(&s.damage_region))?;
    writeln!(
        out,
        "    dirty: {}{}",
        s.dirty,
        if s.buffer_changed { " (new buffer)" } else { "" },
    )
}

fn fence(raw: RawFence) -> String {
    if raw == NO_FENCE {
        "-".to_owned()
    } else {
        raw.to_string()
    }
}

fn rects(region: &Region) -> String {
    if region.is_empty() {
        return "(none)".to_owned();
    }
    let list = region
        .rects()
        .iter()
        .map(|r| format!("{r:?}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {list}", region.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::diag::DiagnosticsConfig;
    use strata_core::geometry::IntRect;
    use strata_core::layer::{Color, CompositionType};
    use strata_core::registry::{DisplayId, LayerContext};

    fn dump(stack: &LayerStack) -> String {
        let mut out = Vec::new();
        write_stack(stack, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_stack() {
        let stack = LayerStack::new(
            DisplayId(1),
            LayerContext::detached(DiagnosticsConfig::silent()),
        );
        assert_eq!(dump(&stack), "Display Disp1: 0 layers\n");
    }

    #[test]
    fn layers_are_listed_bottom_up() {
        let mut stack = LayerStack::new(
            DisplayId(0),
            LayerContext::detached(DiagnosticsConfig::silent()),
        );
        let top = stack.create_layer();
        let bottom = stack.create_layer();
        stack.get_mut(top).unwrap().set_z_order(9);

        let text = dump(&stack);
        let top_at = text.find(&format!("{top:?} z=9")).unwrap();
        let bottom_at = text.find(&format!("{bottom:?} z=0")).unwrap();
        assert!(bottom_at < top_at, "{text}");
        assert!(text.starts_with("Display Disp0: 2 layers\n"), "{text}");
    }

    #[test]
    fn solid_fill_block() {
        let mut stack = LayerStack::new(
            DisplayId(0),
            LayerContext::detached(DiagnosticsConfig::silent()),
        );
        let id = stack.create_layer();
        let layer = stack.get_mut(id).unwrap();
        layer.set_composition_type(CompositionType::SolidColor).unwrap();
        layer.set_color(Color::new(0x10, 0x20, 0x30, 0xFF));
        layer.set_display_frame(IntRect::new(10, 10, 110, 60));
        layer
            .set_visible_region(&[IntRect::new(0, 0, 8, 8)])
            .unwrap();

        let text = dump(&stack);
        assert!(text.contains("type=SolidColor validated=-"), "{text}");
        assert!(text.contains("buffer=none acquire=- release=-"), "{text}");
        assert!(text.contains("color=0xff102030 (dim)"), "{text}");
        assert!(text.contains("frame=[10, 10, 110, 60] 100x50"), "{text}");
        assert!(text.contains("visible: 1 [0, 0, 8, 8]"), "{text}");
        assert!(text.contains("damage: (none)"), "{text}");
        assert!(
            text.contains("dirty: COLOR | COMPOSITION_TYPE | DISPLAY_FRAME | VISIBLE_REGION"),
            "{text}"
        );
    }
}
