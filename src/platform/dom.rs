//! DOM-backed display surface
//!
//! Singletons bind to the page's existing elements by id when present
//! (`#ball`, `#player-paddle`, `#score`, `#game-over-message`,
//! `#start-button`); everything else is a `div` appended to the board.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::ClientError;
use crate::view::{Attributes, ElementKind, Surface, Transition};

/// Data attribute remembering the current kind class
const KIND_ATTR: &str = "data-kind";

pub struct DomSurface {
    document: Document,
    board: Element,
}

impl DomSurface {
    /// Bind to the `#game-board` element, or the body when there is none
    pub fn new(document: Document) -> Result<Self, ClientError> {
        let board = match document.get_element_by_id("game-board") {
            Some(board) => board,
            None => document
                .body()
                .map(Element::from)
                .ok_or_else(|| ClientError::MissingElement("game-board".to_string()))?,
        };
        Ok(Self { document, board })
    }

    fn element_id(kind: ElementKind) -> Option<&'static str> {
        match kind {
            ElementKind::PrimaryBall => Some("ball"),
            ElementKind::Paddle => Some("player-paddle"),
            ElementKind::Score => Some("score"),
            ElementKind::Status => Some("game-over-message"),
            ElementKind::StartButton => Some("start-button"),
            _ => None,
        }
    }

    fn base_class(kind: ElementKind) -> &'static str {
        match kind {
            ElementKind::PrimaryBall | ElementKind::Ball => "ball",
            ElementKind::Paddle => "paddle",
            ElementKind::Score => "score",
            ElementKind::Status => "status-message",
            ElementKind::StartButton => "start-button",
            ElementKind::Brick => "brick",
            ElementKind::FallingItem => "falling-item",
        }
    }
}

fn px(value: f32) -> String {
    format!("{}px", value)
}

fn transition_css(transition: Transition) -> String {
    match transition {
        Transition::Instant => "none".to_string(),
        Transition::Linear(d) => {
            let ms = d.as_millis();
            format!("left {ms}ms linear, top {ms}ms linear")
        }
    }
}

impl Surface for DomSurface {
    type Handle = HtmlElement;

    fn create(&mut self, kind: ElementKind) -> Result<HtmlElement, ClientError> {
        if let Some(id) = Self::element_id(kind) {
            if let Some(existing) = self.document.get_element_by_id(id) {
                return existing
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| ClientError::Host(format!("#{} is not an HTML element", id)));
            }
        }

        let tag = if kind == ElementKind::StartButton { "button" } else { "div" };
        let element = self.document.create_element(tag)?;
        if let Some(id) = Self::element_id(kind) {
            element.set_id(id);
        }
        element.class_list().add_1(Self::base_class(kind))?;
        self.board.append_child(&element)?;
        element
            .dyn_into::<HtmlElement>()
            .map_err(|_| ClientError::Host("created element is not an HTML element".to_string()))
    }

    fn set_attributes(&mut self, element: &HtmlElement, attrs: &Attributes) {
        let style = element.style();
        // Transition first so the position change below uses it
        if let Some(transition) = attrs.transition {
            let _ = style.set_property("transition", &transition_css(transition));
        }
        let props = [
            ("left", attrs.x),
            ("top", attrs.y),
            ("width", attrs.width),
            ("height", attrs.height),
        ];
        for (name, value) in props {
            if let Some(value) = value {
                let _ = style.set_property(name, &px(value));
            }
        }

        if let Some(text) = &attrs.text {
            element.set_text_content(Some(text.as_str()));
        }

        let classes = element.class_list();
        if let Some(visible) = attrs.visible {
            let _ = classes.toggle_with_force("hidden", !visible);
        }
        for (class, on) in &attrs.classes {
            let _ = classes.toggle_with_force(class, *on);
        }
        if let Some(kind) = &attrs.kind {
            if let Some(previous) = element.get_attribute(KIND_ATTR) {
                let _ = classes.remove_1(&previous);
            }
            if kind.is_empty() {
                let _ = element.remove_attribute(KIND_ATTR);
            } else {
                let _ = classes.add_1(kind);
                let _ = element.set_attribute(KIND_ATTR, kind);
            }
        }
    }

    fn destroy(&mut self, element: HtmlElement) {
        element.remove();
    }

    fn reorder(&mut self, elements: &[&HtmlElement]) {
        for element in elements {
            if let Err(e) = self.board.append_child(element) {
                log::warn!("Reorder failed: {:?}", e);
            }
        }
    }
}
