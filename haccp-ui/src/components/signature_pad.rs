//! Signature Pad Component
//!
//! Canvas the operator signs on with mouse or finger. Pointer positions are
//! mapped from client coordinates into the canvas resolution, so strokes
//! land under the pointer however the canvas is scaled or scrolled.

use leptos::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Drawing surface resolution
const SURFACE_WIDTH: u32 = 800;
const SURFACE_HEIGHT: u32 = 400;

/// Signature drawing surface.
///
/// `on_change` receives the PNG data URL after every stroke and `None` when
/// cleared. Bumping `reset` clears the surface.
#[component]
pub fn SignaturePad(
    #[prop(into)]
    on_change: Callback<Option<String>>,
    #[prop(into)]
    reset: Signal<u32>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let drawing = create_rw_signal(false);

    let surface = move || -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
        let canvas = canvas_ref.get()?;
        let canvas: HtmlCanvasElement = (*canvas).clone();
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some((canvas, ctx))
    };

    let blank = move || {
        if let Some((canvas, ctx)) = surface() {
            ctx.set_fill_style(&JsValue::from_str("#ffffff"));
            ctx.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    };

    create_effect(move |_| {
        let _ = reset.get();
        blank();
        drawing.set(false);
    });

    let start = move |client_x: f64, client_y: f64| {
        if let Some((canvas, ctx)) = surface() {
            let (x, y) = to_surface(&canvas, client_x, client_y);
            ctx.set_stroke_style(&JsValue::from_str("#111827"));
            ctx.set_line_width(2.5);
            ctx.set_line_cap("round");
            ctx.set_line_join("round");
            ctx.begin_path();
            ctx.move_to(x, y);
            drawing.set(true);
        }
    };

    let extend = move |client_x: f64, client_y: f64| {
        if !drawing.get_untracked() {
            return;
        }
        if let Some((canvas, ctx)) = surface() {
            let (x, y) = to_surface(&canvas, client_x, client_y);
            ctx.line_to(x, y);
            ctx.stroke();
        }
    };

    let finish = move || {
        if !drawing.get_untracked() {
            return;
        }
        drawing.set(false);
        if let Some((canvas, _)) = surface() {
            match canvas.to_data_url_with_type("image/png") {
                Ok(url) => on_change.call(Some(url)),
                Err(_) => web_sys::console::error_1(&"Signature could not be captured".into()),
            }
        }
    };

    let clear = move |_| {
        blank();
        on_change.call(None);
    };

    view! {
        <div class="space-y-2">
            <canvas
                node_ref=canvas_ref
                width=SURFACE_WIDTH
                height=SURFACE_HEIGHT
                class="w-full max-w-md bg-white rounded-lg border border-gray-600 touch-none cursor-crosshair"
                on:mousedown=move |ev| start(ev.client_x() as f64, ev.client_y() as f64)
                on:mousemove=move |ev| extend(ev.client_x() as f64, ev.client_y() as f64)
                on:mouseup=move |_| finish()
                on:mouseleave=move |_| finish()
                on:touchstart=move |ev| {
                    ev.prevent_default();
                    if let Some(touch) = ev.touches().get(0) {
                        start(touch.client_x() as f64, touch.client_y() as f64);
                    }
                }
                on:touchmove=move |ev| {
                    ev.prevent_default();
                    if let Some(touch) = ev.touches().get(0) {
                        extend(touch.client_x() as f64, touch.client_y() as f64);
                    }
                }
                on:touchend=move |_| finish()
            />
            <button
                type="button"
                on:click=clear
                class="px-3 py-1 text-sm bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
            >
                "Clear signature"
            </button>
        </div>
    }
}

/// Client coordinates to canvas pixels, compensating offset and CSS scaling
fn to_surface(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let scale_x = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let scale_y = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };

    (
        (client_x - rect.left()) * scale_x,
        (client_y - rect.top()) * scale_y,
    )
}
