//! `window.setInterval` timers

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::input::IntervalTimer;

/// Shared slot for the tick callback. The callback usually needs the
/// session that owns this timer, so it is installed after construction.
pub type TickCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct WindowInterval {
    window: Window,
    callback: TickCallback,
}

impl WindowInterval {
    pub fn new(window: Window, callback: TickCallback) -> Self {
        Self { window, callback }
    }
}

impl IntervalTimer for WindowInterval {
    type Handle = i32;

    fn start(&mut self, period: Duration) -> Option<i32> {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            log::warn!("Interval started before its callback was installed");
            return None;
        };
        let millis = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("setInterval failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: i32) {
        self.window.clear_interval_with_handle(handle);
    }
}
