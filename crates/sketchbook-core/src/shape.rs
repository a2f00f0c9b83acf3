//! Easable shapes and shape collections.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::angle::normalize_angle;

/// Easing rate used when a shape does not carry its own.
pub const DEFAULT_EASE: f64 = 0.12;

/// Squared distance below which a shape snaps onto its target position.
pub const ARRIVE_DISTANCE_SQ: f64 = 0.25;

/// Angular distance (radians) below which a shape snaps onto its target rotation.
pub const ARRIVE_ANGLE: f64 = 0.01;

/// A movable, rotatable shape with optional easing targets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shape {
    /// Current horizontal position.
    pub x: f64,
    /// Current vertical position.
    pub y: f64,
    /// Current rotation in radians.
    pub rotation: f64,
    /// Target horizontal position, if any.
    pub tx: Option<f64>,
    /// Target vertical position, if any.
    pub ty: Option<f64>,
    /// Target rotation, if any.
    pub trot: Option<f64>,
    /// Per-shape easing rate.
    pub ease: Option<f64>,
}

impl Shape {
    /// Create a shape at rest with no targets.
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            rotation,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, tx: f64, ty: f64) -> Self {
        self.set_target(tx, ty);
        self
    }

    pub fn with_target_rotation(mut self, trot: f64) -> Self {
        self.trot = Some(trot);
        self
    }

    pub fn with_ease(mut self, ease: f64) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Set the target position.
    pub fn set_target(&mut self, tx: f64, ty: f64) {
        self.tx = Some(tx);
        self.ty = Some(ty);
    }

    /// Set the target rotation.
    pub fn set_target_rotation(&mut self, trot: f64) {
        self.trot = Some(trot);
    }

    /// The easing rate this shape moves with, always in `(0, 1]`.
    pub fn rate(&self) -> f64 {
        match self.ease {
            Some(e) if e.is_finite() && e > 0.0 => e.min(1.0),
            _ => DEFAULT_EASE,
        }
    }

    fn position_delta(&self) -> (f64, f64) {
        let dx = self.tx.map_or(0.0, |tx| tx - self.x);
        let dy = self.ty.map_or(0.0, |ty| ty - self.y);
        (dx, dy)
    }

    fn rotation_delta(&self) -> f64 {
        self.trot
            .map_or(0.0, |trot| normalize_angle(trot - self.rotation))
    }

    /// Whether the shape is within the arrival thresholds of its targets.
    pub fn is_arrived(&self) -> bool {
        let (dx, dy) = self.position_delta();
        dx * dx + dy * dy <= ARRIVE_DISTANCE_SQ && self.rotation_delta().abs() <= ARRIVE_ANGLE
    }

    /// Advance one frame toward the targets.
    ///
    /// Returns `true` once both position and rotation have arrived, at which
    /// point the specified targets have been snapped onto exactly. A step too
    /// small to change a coordinate at its magnitude also counts as arrival.
    pub fn step(&mut self) -> bool {
        let e = self.rate();

        let (dx, dy) = self.position_delta();
        let position_arrived = if dx * dx + dy * dy > ARRIVE_DISTANCE_SQ {
            let (x, y) = (self.x + dx * e, self.y + dy * e);
            let stuck = x == self.x && y == self.y;
            self.x = x;
            self.y = y;
            if stuck {
                self.snap_position();
            }
            stuck
        } else {
            self.snap_position();
            true
        };

        let diff = self.rotation_delta();
        let rotation_arrived = if diff.abs() > ARRIVE_ANGLE {
            let rotation = self.rotation + diff * e;
            let stuck = rotation == self.rotation;
            self.rotation = rotation;
            if stuck {
                self.snap_rotation();
            }
            stuck
        } else {
            self.snap_rotation();
            true
        };

        position_arrived && rotation_arrived
    }

    fn snap_position(&mut self) {
        if let Some(tx) = self.tx {
            self.x = tx;
        }
        if let Some(ty) = self.ty {
            self.y = ty;
        }
    }

    fn snap_rotation(&mut self) {
        if let Some(trot) = self.trot {
            self.rotation = trot;
        }
    }
}

impl AsRef<Shape> for Shape {
    fn as_ref(&self) -> &Shape {
        self
    }
}

impl AsMut<Shape> for Shape {
    fn as_mut(&mut self) -> &mut Shape {
        self
    }
}

/// Identity of a [`ShapeCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

impl CollectionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An ordered set of easable items with a stable identity.
///
/// Not `Clone`: a copy would need a fresh identity, which callers should ask
/// for explicitly with [`ShapeCollection::from_items`].
#[derive(Debug)]
pub struct ShapeCollection<T = Shape> {
    id: CollectionId,
    items: Vec<T>,
}

impl<T> Default for ShapeCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ShapeCollection<T> {
    /// Create an empty collection with a fresh identity.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Wrap existing items in a collection with a fresh identity.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            id: CollectionId::next(),
            items,
        }
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the contents, keeping the identity.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the items. The identity is unaffected.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T: AsRef<Shape>> ShapeCollection<T> {
    /// Whether every item has arrived.
    pub fn all_arrived(&self) -> bool {
        self.items.iter().all(|item| item.as_ref().is_arrived())
    }
}

impl<T: AsMut<Shape>> ShapeCollection<T> {
    /// Step every item once; `true` if all of them arrived.
    ///
    /// Every item is stepped even after one reports it is still moving.
    pub fn step_all(&mut self) -> bool {
        self.items
            .iter_mut()
            .fold(true, |all, item| item.as_mut().step() && all)
    }
}

impl<T> FromIterator<T> for ShapeCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a ShapeCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
