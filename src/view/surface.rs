//! Display surface capability
//!
//! The renderer never touches the DOM directly. It creates, mutates,
//! destroys and reorders opaque handles through [`Surface`]. The browser
//! implementation lives in `platform::dom`; [`MemorySurface`] is the
//! headless one used by tests and the native build.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use glam::Vec2;

use crate::error::ClientError;

/// What a visual element represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    /// Single-ball variant ball
    PrimaryBall,
    Paddle,
    Score,
    /// "Game Over" / "Press to start" banner
    Status,
    StartButton,
    Brick,
    FallingItem,
    /// Ball in the multi-ball variant
    Ball,
}

impl ElementKind {
    /// Singletons exist once per page and are never destroyed
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            ElementKind::PrimaryBall
                | ElementKind::Paddle
                | ElementKind::Score
                | ElementKind::Status
                | ElementKind::StartButton
        )
    }
}

/// How a position change is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Jump straight to the new position
    Instant,
    /// Slide linearly over the given duration
    Linear(Duration),
}

/// A set of overwrite-only mutations. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub text: Option<String>,
    pub visible: Option<bool>,
    /// Class toggles: each named class is forced on or off
    pub classes: Vec<(&'static str, bool)>,
    /// Kind tag; replaces whatever kind tag the element had before
    pub kind: Option<String>,
    pub transition: Option<Transition>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-left position
    pub fn at(mut self, pos: Vec2) -> Self {
        self.x = Some(pos.x);
        self.y = Some(pos.y);
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.width = Some(size.x);
        self.height = Some(size.y);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn shown(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_class(mut self, class: &'static str, on: bool) -> Self {
        self.classes.push((class, on));
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }
}

/// Capability interface over the presentation technology
pub trait Surface {
    type Handle;

    /// Create an element and attach it after the existing ones.
    /// Singleton kinds may resolve to an element that already exists.
    fn create(&mut self, kind: ElementKind) -> Result<Self::Handle, ClientError>;

    /// Apply overwrite-only mutations
    fn set_attributes(&mut self, handle: &Self::Handle, attrs: &Attributes);

    /// Detach and drop an element
    fn destroy(&mut self, handle: Self::Handle);

    /// Move the given elements to the end of the surface, in order
    fn reorder(&mut self, handles: &[&Self::Handle]);
}

/// Observable state of one headless element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    pub kind: Option<ElementKind>,
    pub pos: Vec2,
    pub size: Vec2,
    pub text: String,
    pub visible: bool,
    pub classes: BTreeSet<String>,
    pub tag: Option<String>,
    pub transition: Option<Transition>,
}

impl MemoryElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn apply(&mut self, attrs: &Attributes) {
        if let Some(x) = attrs.x {
            self.pos.x = x;
        }
        if let Some(y) = attrs.y {
            self.pos.y = y;
        }
        if let Some(w) = attrs.width {
            self.size.x = w;
        }
        if let Some(h) = attrs.height {
            self.size.y = h;
        }
        if let Some(text) = &attrs.text {
            self.text.clone_from(text);
        }
        if let Some(visible) = attrs.visible {
            self.visible = visible;
        }
        for (class, on) in &attrs.classes {
            if *on {
                self.classes.insert((*class).to_string());
            } else {
                self.classes.remove(*class);
            }
        }
        if let Some(kind) = &attrs.kind {
            if let Some(previous) = self.tag.take() {
                self.classes.remove(&previous);
            }
            if !kind.is_empty() {
                self.classes.insert(kind.clone());
                self.tag = Some(kind.clone());
            }
        }
        if attrs.transition.is_some() {
            self.transition = attrs.transition;
        }
    }
}

/// Surface operations that change membership or order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOp {
    Create(u32, ElementKind),
    Destroy(u32),
    Reorder,
}

/// Headless surface: elements in a map, display order in a list
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: BTreeMap<u32, MemoryElement>,
    order: Vec<u32>,
    singletons: BTreeMap<ElementKind, u32>,
    ops: Vec<SurfaceOp>,
    next_id: u32,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, handle: u32) -> Option<&MemoryElement> {
        self.elements.get(&handle)
    }

    /// Singleton element of the given kind, if created
    pub fn singleton(&self, kind: ElementKind) -> Option<&MemoryElement> {
        self.singletons.get(&kind).and_then(|h| self.elements.get(h))
    }

    /// Elements of one kind in display order
    pub fn elements_of(&self, kind: ElementKind) -> Vec<&MemoryElement> {
        self.order
            .iter()
            .filter_map(|h| self.elements.get(h))
            .filter(|e| e.kind == Some(kind))
            .collect()
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Membership/order history
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Element state and display order, for before/after comparisons
    pub fn state(&self) -> (Vec<u32>, BTreeMap<u32, MemoryElement>) {
        (self.order.clone(), self.elements.clone())
    }

    fn count(&self, pred: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Number of elements of a kind ever created
    pub fn created(&self, kind: ElementKind) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Create(_, k) if *k == kind))
    }

    /// Number of elements destroyed
    pub fn destroyed(&self) -> usize {
        self.count(|op| matches!(op, SurfaceOp::Destroy(_)))
    }
}

impl Surface for MemorySurface {
    type Handle = u32;

    fn create(&mut self, kind: ElementKind) -> Result<u32, ClientError> {
        if let Some(handle) = self.singletons.get(&kind) {
            return Ok(*handle);
        }
        let handle = self.next_id;
        self.next_id += 1;
        self.elements.insert(
            handle,
            MemoryElement {
                kind: Some(kind),
                visible: true,
                ..Default::default()
            },
        );
        self.order.push(handle);
        if kind.is_singleton() {
            self.singletons.insert(kind, handle);
        }
        self.ops.push(SurfaceOp::Create(handle, kind));
        Ok(handle)
    }

    fn set_attributes(&mut self, handle: &u32, attrs: &Attributes) {
        if let Some(element) = self.elements.get_mut(handle) {
            element.apply(attrs);
        }
    }

    fn destroy(&mut self, handle: u32) {
        if self.elements.remove(&handle).is_some() {
            self.order.retain(|h| *h != handle);
            self.ops.push(SurfaceOp::Destroy(handle));
        }
    }

    fn reorder(&mut self, handles: &[&u32]) {
        self.order.retain(|h| !handles.contains(&h));
        self.order.extend(handles.iter().map(|h| **h));
        self.ops.push(SurfaceOp::Reorder);
    }
}
