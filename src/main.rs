//! Brick Pong client entry point
//!
//! On the web: waits for the page, connects to the server and wires DOM
//! events into a single session. Natively: replays a short scripted match
//! against the headless surface.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_client {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, Window};

    use brick_pong_client::platform::timer::TickCallback;
    use brick_pong_client::platform::{DomSurface, WebSocketChannel, WindowInterval};
    use brick_pong_client::{ClientError, Session, Settings};

    type WebSession = Session<DomSurface, WindowInterval, WebSocketChannel>;

    /// Run once the DOM is ready
    pub fn start() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            web_sys::console::error_1(&"Brick Pong: no document".into());
            return;
        };

        let loading = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
            .ok()
            .and_then(|state| state.as_string())
            .is_some_and(|state| state == "loading");
        if loading {
            let closure = Closure::once(move |_event: web_sys::Event| report(run()));
            let _ = document.add_event_listener_with_callback(
                "DOMContentLoaded",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        } else {
            report(run());
        }
    }

    fn report(result: Result<(), ClientError>) {
        if let Err(e) = result {
            log::error!("Brick Pong failed to start: {}", e);
            web_sys::console::error_1(&format!("Brick Pong failed to start: {}", e).into());
        }
    }

    fn run() -> Result<(), ClientError> {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        console_log::init_with_level(settings.log_level())
            .map_err(|e| ClientError::Host(e.to_string()))?;

        log::info!("Brick Pong client starting...");

        let window = web_sys::window().ok_or_else(|| ClientError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ClientError::Host("no document".into()))?;

        let url = settings
            .server_url
            .clone()
            .unwrap_or_else(|| default_server_url(&window));
        let channel = WebSocketChannel::connect(&url)?;

        let tick: TickCallback = Rc::new(RefCell::new(None));
        let surface = DomSurface::new(document.clone())?;
        let timer = WindowInterval::new(window.clone(), tick.clone());
        let session = Rc::new(RefCell::new(Session::new(
            &settings,
            surface,
            timer,
            channel.clone(),
        )?));

        // Repeat timer ticks
        {
            let session = session.clone();
            *tick.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
                session.borrow_mut().on_repeat_tick();
            }));
        }

        // Server frames
        {
            let session = session.clone();
            channel.on_text(move |text| {
                session
                    .borrow_mut()
                    .on_message(&text, js_sys::Date::now());
            });
        }

        setup_keyboard(&window, session.clone());
        setup_start_button(&document, session.clone());
        setup_focus_loss(&window, session);

        log::info!("Brick Pong client running ({})", url);
        Ok(())
    }

    /// `ws(s)://<page host>/ws`
    fn default_server_url(window: &Window) -> String {
        let location = window.location();
        let scheme = match location.protocol().as_deref() {
            Ok("https:") => "wss",
            _ => "ws",
        };
        let host = location
            .host()
            .unwrap_or_else(|_| "localhost:5000".to_string());
        format!("{}://{}/ws", scheme, host)
    }

    fn setup_keyboard(window: &Window, session: Rc<RefCell<WebSession>>) {
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if session.borrow_mut().on_key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if session.borrow_mut().on_key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(document: &Document, session: Rc<RefCell<WebSession>>) {
        if let Some(btn) = document.get_element_by_id("start-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                session.borrow_mut().on_start_clicked();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Key-ups are lost while the window is unfocused
    fn setup_focus_loss(window: &Window, session: Rc<RefCell<WebSession>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            session.borrow_mut().on_focus_lost();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_client::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Pong client (native) starting...");
    log::info!("The browser client targets wasm32 - run with `trunk serve` for the web version");

    println!("\nReplaying scripted match...");
    replay_match();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn replay_match() {
    use std::time::Duration;

    use brick_pong_client::input::ManualTimer;
    use brick_pong_client::protocol::Intent;
    use brick_pong_client::view::MemorySurface;
    use brick_pong_client::{Session, Settings};

    const FRAMES: [&str; 4] = [
        r#"{"event":"game_state","data":{"ball_x":400,"ball_y":300,"player_paddle_x":350,"player_paddle_width":100,"score":0,"game_started":false,"game_over":false,"ball_moving":false,"bricks":[{"x":0,"y":0,"width":50,"height":20,"breakable":true},{"x":60,"y":0,"width":50,"height":20,"breakable":false}],"falling_items":[]}}"#,
        r#"{"event":"game_state","data":{"ball_x":405,"ball_y":305,"player_paddle_x":330,"player_paddle_width":100,"score":0,"game_started":true,"game_over":false,"ball_moving":true,"bricks":[{"x":0,"y":0,"width":50,"height":20,"breakable":true},{"x":60,"y":0,"width":50,"height":20,"breakable":false}],"falling_items":[{"id":"p1","x":20,"y":40,"type":"grow"}]}}"#,
        r#"{"event":"game_state","data":{"ball_x":410,"ball_y":310,"player_paddle_x":310,"player_paddle_width":140,"score":1,"game_started":true,"game_over":false,"ball_moving":true,"bricks":[{"x":60,"y":0,"width":50,"height":20,"breakable":false}],"falling_items":[]}}"#,
        r#"{"event":"game_state","data":{"ball_x":410,"ball_y":610,"player_paddle_x":310,"player_paddle_width":140,"score":1,"game_started":false,"game_over":true,"ball_moving":false,"bricks":[{"x":60,"y":0,"width":50,"height":20,"breakable":false}],"falling_items":[]}}"#,
    ];

    let settings = Settings::load();
    let mut session = match Session::new(
        &settings,
        MemorySurface::new(),
        ManualTimer::new(),
        Vec::<Intent>::new(),
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Could not create session: {}", e);
            return;
        }
    };

    session.on_key_down(" ");
    session.on_key_down("ArrowLeft");
    for (i, frame) in FRAMES.iter().enumerate() {
        let ticks = session
            .encoder_mut()
            .timer_mut()
            .elapse(Duration::from_millis(16));
        for _ in 0..ticks {
            session.on_repeat_tick();
        }
        session.on_message(frame, i as f64 * 16.0);

        let view = session.renderer();
        println!(
            "  frame {}: {} bricks, {} falling items, status {:?}",
            i,
            view.bricks().len(),
            view.falling_items().len(),
            view.status()
        );
    }
    session.on_key_up("ArrowLeft");

    println!(
        "✓ Replayed {} snapshots, {} intents sent ({} live elements)",
        session.snapshots(),
        session.sink().len(),
        session.surface().len()
    );
}
