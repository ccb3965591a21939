#![allow(non_snake_case)]
use dioxus::{
    desktop::{Config, LogicalSize, WindowBuilder},
    prelude::*,
};

/// One image in the viewer, `src` is a data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub src: String,
}

#[derive(Clone)]
struct Panels(Vec<Panel>);

#[component]
fn App() -> Element {
    let panels = use_context::<Panels>();

    rsx! {
        div { style: "display: flex; gap: 24px; padding: 16px; font-family: sans-serif;",
            for panel in panels.0.into_iter() {
                div { key: "{panel.title}",
                    h3 { "{panel.title}" }
                    img {
                        style: "image-rendering: pixelated; max-width: 560px; user-select: none;",
                        src: "{panel.src}",
                    }
                }
            }
        }
    }
}

/// Blocks until the window is closed.
pub fn show(title: &str, panels: Vec<Panel>) {
    LaunchBuilder::new()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(title)
                    .with_always_on_top(false)
                    .with_inner_size(LogicalSize::new(1200.0, 700.0)),
            ),
        )
        .with_context(Panels(panels))
        .launch(App);
}
