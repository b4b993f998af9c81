//! Orbit Menu entry point
//!
//! Wires DOM events into the controller on wasm32 and applies the computed
//! placements back to the page. The native build runs a placement smoke
//! check instead.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_widget {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, CssStyleDeclaration, Document, HtmlElement, MouseEvent,
        TouchEvent,
    };

    use glam::Vec2;
    use orbit_menu::MenuConfig;
    use orbit_menu::input::PointerKind;
    use orbit_menu::menu::{
        CloseTransition, MenuController, MenuFrame, OpenTransition, Press, ReleaseOutcome, Toggle,
    };

    /// Controller plus the DOM handles it drives
    struct Widget {
        controller: MenuController,
        button: HtmlElement,
        container: HtmlElement,
        items: Vec<HtmlElement>,
    }

    impl Widget {
        fn apply_anchor(&self) {
            let anchor = self.controller.anchor();
            let style = self.button.style();
            let _ = style.set_property("left", &format!("{}px", anchor.x));
            let _ = style.set_property("top", &format!("{}px", anchor.y));
        }

        fn apply_menu_center(&self, center: Vec2) {
            let style = self.container.style();
            let _ = style.set_property("left", &format!("{}px", center.x));
            let _ = style.set_property("top", &format!("{}px", center.y));
        }

        /// Synchronous re-placement during a drag: transforms applied
        /// directly, with animations and transitions out of the way
        fn apply_menu_frame(&self, frame: &MenuFrame) {
            self.apply_menu_center(frame.center);
            for (item, placement) in self.items.iter().zip(&frame.items) {
                let style = item.style();
                let _ = style.set_property(
                    "transform",
                    &format!(
                        "scale(1) rotate(0deg) translate({}px, {}px)",
                        placement.offset.x, placement.offset.y
                    ),
                );
                let _ = style.set_property("opacity", if placement.visible { "1" } else { "0" });
                let _ = style.set_property("animation", "none");
                let _ = style.set_property("transition", "none");
            }
        }

        fn apply_open(&self, transition: &OpenTransition) {
            self.apply_menu_center(transition.center);
            let _ = self.container.class_list().remove_1("closed");
            let _ = self.container.class_list().add_1("open");

            for (item, open) in self.items.iter().zip(&transition.items) {
                let placement = open.placement;
                let style = item.style();
                let _ = style.set_property("--translate-x", &format!("{}px", placement.offset.x));
                let _ = style.set_property("--translate-y", &format!("{}px", placement.offset.y));
                let _ = style.set_property("--animation-delay", &format!("{}s", open.delay_s));

                // Clear leftovers from a previous cycle and let the CSS
                // animation take over from a clean slate
                let _ = item.class_list().remove_1("closing");
                let _ = style.remove_property("animation");
                let _ = style.remove_property("transform");
                let _ = style.remove_property("opacity");
                let _ = style.remove_property("transition");
                let _ = item.offset_width(); // force reflow so the animation restarts

                if !placement.visible {
                    let _ = style.set_property("opacity", "0");
                }
            }
        }

        fn apply_close(&self, transition: &CloseTransition) {
            let _ = self.container.class_list().remove_1("open");
            let _ = self.container.class_list().add_1("closed");

            for (item, close) in self.items.iter().zip(&transition.items) {
                let _ = item
                    .style()
                    .set_property("--animation-delay-close", &format!("{}s", close.delay_s));
                let _ = item.class_list().add_1("closing");
                schedule_item_cleanup(item.clone(), close.cleanup_at_ms);
            }
        }

        fn set_grabbing(&self, grabbing: bool) {
            let style = self.button.style();
            if grabbing {
                let _ = style.set_property("cursor", "grabbing");
                let _ = style.set_property("transition", "none");
            } else {
                let _ = style.set_property("cursor", "grab");
                let _ = style.remove_property("transition");
            }
        }

        fn freeze_item_transitions(&self) {
            for item in &self.items {
                let _ = item.style().set_property("transition", "none");
            }
        }

        fn restore_item_transitions(&self) {
            for item in &self.items {
                let _ = item.style().remove_property("transition");
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Orbit menu starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let button: HtmlElement = document
            .get_element_by_id("draggable-button")
            .expect("no draggable button")
            .dyn_into()
            .expect("not an html element");
        let container: HtmlElement = document
            .get_element_by_id("menu-container")
            .expect("no menu container")
            .dyn_into()
            .expect("not an html element");

        let list = document.query_selector_all(".menu-item").expect("bad selector");
        let mut items = Vec::with_capacity(list.length() as usize);
        for i in 0..list.length() {
            if let Some(node) = list.get(i) {
                if let Ok(item) = node.dyn_into::<HtmlElement>() {
                    items.push(item);
                }
            }
        }

        let config = resolve_config(&window, &document);
        let mut controller = MenuController::new(config, items.len());
        controller.set_layout(Vec2::splat(button.offset_width() as f32), viewport(&window));

        let widget = Rc::new(RefCell::new(Widget {
            controller,
            button,
            container,
            items,
        }));
        widget.borrow().apply_anchor();

        setup_button_handlers(&widget);
        setup_document_handlers(&widget);
        setup_item_handlers(&widget);

        log::info!("Orbit menu running with {} items", widget.borrow().items.len());
    }

    fn setup_button_handlers(widget: &Rc<RefCell<Widget>>) {
        let button = widget.borrow().button.clone();

        // Mouse down starts a drag session (primary button only)
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let point = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let mut w = widget.borrow_mut();
                if w.controller.pointer_down(PointerKind::Mouse, point, js_sys::Date::now())
                    == Press::Started
                {
                    w.set_grabbing(true);
                    if w.controller.menu_shown() {
                        w.freeze_item_transitions();
                    }
                }
            });
            let _ = button
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (single touch only); passive, scrolling is blocked
        // per-move instead
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() != 1 {
                    return;
                }
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                let mut w = widget.borrow_mut();
                if w.controller.pointer_down(PointerKind::Touch, point, js_sys::Date::now())
                    == Press::Started
                {
                    w.set_grabbing(true);
                    if w.controller.menu_shown() {
                        w.freeze_item_transitions();
                    }
                }
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            let _ = button.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // The platform's click toggles the menu (unless a drag just ended)
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let toggle = {
                    let mut w = widget.borrow_mut();
                    w.controller.set_viewport(viewport(&web_sys::window().unwrap()));
                    w.controller.click(js_sys::Date::now())
                };
                if let Some(toggle) = toggle {
                    run_toggle(&widget, toggle);
                }
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_document_handlers(widget: &Rc<RefCell<Widget>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Mouse move anywhere drives the drag
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if !widget.borrow().controller.is_dragging() {
                    return;
                }
                let point = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let vp = viewport(&web_sys::window().unwrap());
                let frame = widget.borrow_mut().controller.pointer_move(point, vp);
                if let Some(frame) = frame {
                    let w = widget.borrow();
                    w.apply_anchor();
                    if let Some(menu) = &frame.menu {
                        w.apply_menu_frame(menu);
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up ends the session
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let outcome = widget
                    .borrow_mut()
                    .controller
                    .pointer_up(PointerKind::Mouse, point, js_sys::Date::now());
                if outcome != ReleaseOutcome::Ignored {
                    finish_release(&widget);
                }
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move (non-passive so a live drag can block scrolling)
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() != 1 || !widget.borrow().controller.is_dragging() {
                    return;
                }
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                let vp = viewport(&web_sys::window().unwrap());
                let frame = widget.borrow_mut().controller.pointer_move(point, vp);
                if let Some(frame) = frame {
                    let w = widget.borrow();
                    w.apply_anchor();
                    if let Some(menu) = &frame.menu {
                        w.apply_menu_frame(menu);
                    }
                }
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Touch end / cancel
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let now = js_sys::Date::now();
                match event.changed_touches().get(0) {
                    Some(touch) => {
                        let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                        let outcome = widget
                            .borrow_mut()
                            .controller
                            .pointer_up(PointerKind::Touch, point, now);
                        if outcome != ReleaseOutcome::Ignored {
                            finish_release(&widget);
                        }
                    }
                    None => {
                        // Sequence ended without a touch point; abort the
                        // session without classifying it
                        if widget.borrow_mut().controller.cancel_drag() {
                            finish_release(&widget);
                        }
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            let _ = document
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Presses outside the control and the items close the menu
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let kind = if event.type_() == "touchend" {
                    PointerKind::Touch
                } else {
                    PointerKind::Mouse
                };
                let target = event.target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
                {
                    let w = widget.borrow();
                    if let Some(target) = &target {
                        if w.button.contains(Some(target))
                            || w.items.iter().any(|item| item.contains(Some(target)))
                        {
                            return;
                        }
                    }
                }
                let close = widget
                    .borrow_mut()
                    .controller
                    .outside_press(kind, js_sys::Date::now());
                if let Some(close) = close {
                    run_close(&widget, close);
                }
            });
            let _ = document
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_item_handlers(widget: &Rc<RefCell<Widget>>) {
        let items = widget.borrow().items.clone();
        for (index, item) in items.iter().enumerate() {
            // Activation closes the menu; the event must not reach the
            // document-level outside handler
            {
                let widget = widget.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.stop_propagation();
                    let close = widget
                        .borrow_mut()
                        .controller
                        .item_activated(index, js_sys::Date::now());
                    if let Some(close) = close {
                        run_close(&widget, close);
                    }
                });
                let _ =
                    item.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            // Touch activation also suppresses the trailing synthetic click
            {
                let widget = widget.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    let close = widget
                        .borrow_mut()
                        .controller
                        .item_activated(index, js_sys::Date::now());
                    if let Some(close) = close {
                        run_close(&widget, close);
                    }
                });
                let _ = item
                    .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Shared release path: restore affordances and give an open menu one
    /// final placement at the settled position
    fn finish_release(widget: &Rc<RefCell<Widget>>) {
        let w = widget.borrow();
        w.set_grabbing(false);
        if let Some(frame) = w.controller.menu_frame() {
            w.apply_menu_frame(&frame);
        }
        w.restore_item_transitions();
    }

    fn run_toggle(widget: &Rc<RefCell<Widget>>, toggle: Toggle) {
        match toggle {
            Toggle::Opened(open) => {
                let settles_at = open.settles_at_ms;
                widget.borrow().apply_open(&open);
                schedule_tick(widget.clone(), settles_at);
            }
            Toggle::Closed(close) => run_close(widget, close),
        }
    }

    fn run_close(widget: &Rc<RefCell<Widget>>, close: CloseTransition) {
        let settles_at = close.settles_at_ms;
        widget.borrow().apply_close(&close);
        schedule_tick(widget.clone(), settles_at);
    }

    /// Let the controller settle its Opening/Closing phase once the CSS
    /// animation has played out. Redundant ticks are no-ops.
    fn schedule_tick(widget: Rc<RefCell<Widget>>, at_ms: f64) {
        let delay = (at_ms - js_sys::Date::now()).max(0.0) as i32;
        let closure = Closure::once(move || {
            widget.borrow_mut().controller.tick(js_sys::Date::now());
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay,
            );
        }
        closure.forget();
    }

    /// Reset an item's transient styles once its close animation has played
    /// out. Runs even when a reopen interrupted it; the resets are
    /// idempotent and the reopen rewrites them anyway.
    fn schedule_item_cleanup(item: HtmlElement, cleanup_at_ms: f64) {
        let delay = (cleanup_at_ms - js_sys::Date::now()).max(0.0) as i32;
        let closure = Closure::once(move || {
            let _ = item.class_list().remove_1("closing");
            let style = item.style();
            let _ = style.remove_property("transform");
            let _ = style.remove_property("opacity");
            let _ = style.remove_property("animation");
            let _ = style.remove_property("transition");
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay,
            );
        }
        closure.forget();
    }

    fn viewport(window: &web_sys::Window) -> Vec2 {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32, h as f32)
    }

    /// Resolve geometry and timing from the document's CSS custom
    /// properties, keeping the built-in defaults for anything missing
    fn resolve_config(window: &web_sys::Window, document: &Document) -> MenuConfig {
        let mut config = MenuConfig::default();

        let style = document
            .document_element()
            .and_then(|root| window.get_computed_style(&root).ok().flatten());
        if let Some(style) = style {
            if let Some(v) = css_number(&style, "--menu-radius") {
                config.radius = v;
            }
            if let Some(v) = css_number(&style, "--menu-item-size") {
                config.item_size = v;
            }
            if let Some(v) = css_number(&style, "--animation-duration") {
                config.animation_duration = v;
            }
            if let Some(v) = css_number(&style, "--item-stagger-delay") {
                config.item_stagger = v;
            }
        }

        log::info!(
            "menu config: radius {}px, items {}px, animation {}s + {}s stagger",
            config.radius,
            config.item_size,
            config.animation_duration,
            config.item_stagger,
        );
        config
    }

    /// Leading numeric prefix of a CSS value, unit ignored
    fn css_number(style: &CssStyleDeclaration, name: &str) -> Option<f32> {
        let raw = style.get_property_value(name).ok()?;
        let raw = raw.trim();
        let end = raw
            .char_indices()
            .take_while(|&(i, c)| {
                c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))
            })
            .map(|(i, c)| i + c.len_utf8())
            .last()?;
        raw[..end].parse().ok()
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_widget::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Orbit menu (native) starting...");
    log::info!("The widget needs a DOM - build with trunk for the web version");

    // Run checks
    println!("\nRunning placement checks...");
    placement_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn placement_check() {
    use glam::Vec2;
    use orbit_menu::geom::{free_arc, place_items};

    let arc = free_arc(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0), 100.0, 45.0, 10.0);
    assert_eq!(arc.span_deg, 360.0, "centered anchor should be unobstructed");
    assert_eq!(arc.start_deg, 270.0);

    let items = place_items(arc, 5, 100.0);
    assert!(items.iter().all(|item| item.visible));

    let pinned = free_arc(Vec2::new(5.0, 300.0), Vec2::new(800.0, 600.0), 100.0, 45.0, 10.0);
    assert!(pinned.span_deg < 360.0, "left edge should constrain the arc");

    println!("✓ Placement checks passed!");
}
