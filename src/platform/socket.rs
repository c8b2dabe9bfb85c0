//! WebSocket channel to the game server
//!
//! Text frames only. Intents are sent immediately when the socket is open
//! and dropped otherwise; a stale move is worse than none.

use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::error::ClientError;
use crate::protocol::Intent;
use crate::session::IntentSink;

#[derive(Clone)]
pub struct WebSocketChannel {
    socket: WebSocket,
}

impl WebSocketChannel {
    /// Open the socket and install lifecycle logging
    pub fn connect(url: &str) -> Result<Self, ClientError> {
        let socket = WebSocket::new(url)?;

        {
            let url = url.to_string();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                log::info!("Connected to {}", url);
            });
            socket.set_onopen(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: CloseEvent| {
                log::warn!(
                    "Connection closed (code {}, reason '{}')",
                    event.code(),
                    event.reason()
                );
            });
            socket.set_onclose(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                log::warn!("WebSocket error");
            });
            socket.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        Ok(Self { socket })
    }

    /// Deliver every text frame to `handler`. Binary frames are skipped.
    pub fn on_text(&self, mut handler: impl FnMut(String) + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => handler(text),
                None => log::debug!("{}", ClientError::UnsupportedFrame("binary")),
            }
        });
        self.socket
            .set_onmessage(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }
}

impl IntentSink for WebSocketChannel {
    fn send(&mut self, intent: &Intent) {
        if self.socket.ready_state() != WebSocket::OPEN {
            log::debug!("Socket not open, dropping {:?}", intent);
            return;
        }
        match intent.encode() {
            Ok(text) => {
                if let Err(e) = self.socket.send_with_str(&text) {
                    log::warn!("Send failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("Could not encode {:?}: {}", intent, e),
        }
    }
}
