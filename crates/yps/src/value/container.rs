//! Position-carrying wrappers around parsed values.

use super::Value;
use crate::{Error, Position, Result};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A value together with the position it was parsed from.
///
/// Wrapped values compare, order and hash exactly like the value they hold;
/// see [`Value`]. Implement this trait to plug a custom wrapper into
/// [`LoadOptions::with_value_container`](crate::LoadOptions::with_value_container).
///
/// Collections are handed to the constructor before their items are loaded so
/// that aliases can refer back to them; a custom container must keep the handle
/// rather than copy its contents.
pub trait ValueContainer: fmt::Debug {
    /// The wrapped value.
    fn value(&self) -> Value;

    fn position(&self) -> &Position;

    /// Swap the wrapped value, returning the previous one.
    fn replace(&self, value: Value) -> Result<Value>;

    fn freeze(&self);

    fn is_frozen(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Constructor used to wrap each loaded value.
pub type ContainerConstructor = fn(Value, Position) -> Rc<dyn ValueContainer>;

/// The default wrapper.
pub struct Located {
    value: RefCell<Value>,
    position: Position,
    frozen: Cell<bool>,
}

impl Located {
    pub fn new(value: Value, position: Position) -> Self {
        Self {
            value: RefCell::new(value),
            position,
            frozen: Cell::new(false),
        }
    }

    /// [`ContainerConstructor`] producing `Located` wrappers.
    pub fn construct(value: Value, position: Position) -> Rc<dyn ValueContainer> {
        Rc::new(Self::new(value, position))
    }
}

impl ValueContainer for Located {
    fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn replace(&self, value: Value) -> Result<Value> {
        if self.frozen.get() {
            return Err(Error::Frozen("value"));
        }
        Ok(self.value.replace(value))
    }

    fn freeze(&self) {
        self.frozen.set(true);
    }

    fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Located")
            .field("value", &*self.value.borrow())
            .field("position", &self.position)
            .finish()
    }
}
