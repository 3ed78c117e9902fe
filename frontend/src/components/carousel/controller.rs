//! Carousel controller bound to one rendered slideshow element.
//!
//! The controller reads `data-autoplay` / `data-interval` and the slide count from the
//! markup, feeds DOM events into [`Carousel::handle`] and executes the returned
//! [`Effect`]s. Touch gestures and mouse or pen drags both count as swipes. Timers are
//! instance-owned `gloo-timers` handles and every listener is removed when the
//! controller is dropped, so re-rendered markup can be re-attached without leaking
//! callbacks or leaving intervals running.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use common::carousel::markup::*;
use common::carousel::{Carousel, CarouselConfig, Direction, Effect, Input, Key};
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, EventTarget, FocusEvent, KeyboardEvent, Node, PointerEvent, TouchEvent,
};

struct Attached {
    root: Element,
    slides: Vec<Element>,
    indicators: Vec<Element>,
    machine: Carousel,
    settle: Option<Timeout>,
    autoplay: Option<Interval>,
}

/// A DOM listener that unregisters itself on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

pub struct CarouselController {
    state: Rc<RefCell<Attached>>,
    listeners: Vec<Listener>,
}

impl CarouselController {
    /// Attaches a controller to a `data-carousel` root element.
    pub fn attach(root: Element) -> Self {
        let slides = query_all(&root, &format!(".{CLASS_SLIDE}"));
        let indicators = query_all(&root, &format!("[{ATTR_INDICATOR}]"));
        let config = CarouselConfig::from_attributes(
            slides.len(),
            root.get_attribute(ATTR_AUTOPLAY).as_deref(),
            root.get_attribute(ATTR_INTERVAL).as_deref(),
        );
        let (machine, effects) = Carousel::attach(config);

        let state = Rc::new(RefCell::new(Attached {
            root: root.clone(),
            slides,
            indicators,
            machine,
            settle: None,
            autoplay: None,
        }));
        apply(&state, effects);

        let mut controller = Self {
            state,
            listeners: Vec::new(),
        };
        if config.slide_count > 0 {
            controller.listen_to(&root);
        }
        controller
    }

    /// Attaches a controller to every slideshow below `container`.
    pub fn attach_all(container: &Element) -> Vec<Self> {
        query_all(container, &format!("[{ATTR_CAROUSEL}]"))
            .into_iter()
            .map(Self::attach)
            .collect()
    }

    fn listen_to(&mut self, root: &Element) {
        let target: &EventTarget = root.as_ref();

        self.listen(target, "click", |event, root| {
            let clicked = event.target()?.dyn_into::<Element>().ok()?;
            if clicked.closest(&format!("[{ATTR_PREV}]")).ok()?.is_some() {
                return Some(Input::Prev);
            }
            if clicked.closest(&format!("[{ATTR_NEXT}]")).ok()?.is_some() {
                return Some(Input::Next);
            }
            let indicator = clicked.closest(&format!("[{ATTR_INDICATOR}]")).ok()??;
            let node: &Node = indicator.as_ref();
            if !root.contains(Some(node)) {
                return None;
            }
            let index = indicator.get_attribute(ATTR_INDICATOR)?.parse::<i64>().ok()?;
            Some(Input::GoTo(index))
        });
        self.listen(target, "keydown", |event, _| {
            let key = Key::from_name(&event.dyn_ref::<KeyboardEvent>()?.key());
            if key == Key::Other {
                return None;
            }
            event.prevent_default();
            Some(Input::Key(key))
        });
        self.listen(target, "mouseenter", |_, _| Some(Input::PointerEnter));
        self.listen(target, "mouseleave", |_, _| Some(Input::PointerLeave));
        self.listen(target, "focusin", |_, _| Some(Input::FocusIn));
        self.listen(target, "focusout", |event, root| {
            let next = event
                .dyn_ref::<FocusEvent>()
                .and_then(FocusEvent::related_target)
                .and_then(|t| t.dyn_into::<Node>().ok());
            match next {
                Some(node) if root.contains(Some(&node)) => None,
                _ => Some(Input::FocusOut),
            }
        });
        self.listen(target, "touchstart", |event, _| {
            let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
            Some(Input::SwipeStart {
                x: f64::from(touch.client_x()),
            })
        });
        self.listen(target, "touchend", |event, _| {
            let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
            Some(Input::SwipeEnd {
                x: f64::from(touch.client_x()),
            })
        });

        self.listen(target, "pointerdown", |event, _| {
            let pointer = event.dyn_ref::<PointerEvent>()?;
            Input::from_pointer(&pointer.pointer_type(), true, f64::from(pointer.client_x()))
        });
        self.listen(target, "pointerup", |event, _| {
            let pointer = event.dyn_ref::<PointerEvent>()?;
            Input::from_pointer(&pointer.pointer_type(), false, f64::from(pointer.client_x()))
        });

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let doc = document.clone();
            let document_target: &EventTarget = document.as_ref();
            self.listen(document_target, "visibilitychange", move |_, _| {
                Some(if doc.hidden() {
                    Input::PageHidden
                } else {
                    Input::PageVisible
                })
            });
        }
    }

    /// Registers `map` for `event`; a returned input is dispatched to the machine.
    fn listen<F>(&mut self, target: &EventTarget, event: &'static str, map: F)
    where
        F: Fn(&Event, &Element) -> Option<Input> + 'static,
    {
        let weak = Rc::downgrade(&self.state);
        let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let root = state.borrow().root.clone();
            if let Some(input) = map(&ev, &root) {
                dispatch(&state, input);
            }
        });
        if target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .is_ok()
        {
            self.listeners.push(Listener {
                target: target.clone(),
                event,
                callback,
            });
        }
    }
}

impl Drop for CarouselController {
    fn drop(&mut self) {
        self.listeners.clear();
        let effects = match self.state.try_borrow_mut() {
            Ok(mut attached) => attached.machine.detach(),
            Err(_) => Vec::new(),
        };
        apply(&self.state, effects);
        if let Ok(mut attached) = self.state.try_borrow_mut() {
            attached.settle = None;
            attached.autoplay = None;
        }
    }
}

fn dispatch(state: &Rc<RefCell<Attached>>, input: Input) {
    let effects = match state.try_borrow_mut() {
        Ok(mut attached) => attached.machine.handle(input),
        Err(_) => return,
    };
    apply(state, effects);
}

/// Timer callbacks hop through a task so the timer handle is never dropped while its
/// own callback is running.
fn dispatch_later(weak: Weak<RefCell<Attached>>, input: Input) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(state) = weak.upgrade() {
            dispatch(&state, input);
        }
    });
}

fn apply(state: &Rc<RefCell<Attached>>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Activate {
                from,
                to,
                direction,
            } => state.borrow().activate(from, to, direction),
            Effect::ScheduleSettle(ms) => {
                let weak = Rc::downgrade(state);
                let timeout = Timeout::new(ms, move || dispatch_later(weak, Input::AnimationFinished));
                state.borrow_mut().settle = Some(timeout);
            }
            Effect::CancelSettle => state.borrow_mut().settle = None,
            Effect::Settled { .. } => state.borrow().settled(),
            Effect::ArmAutoplay(ms) => {
                let weak = Rc::downgrade(state);
                let interval =
                    Interval::new(ms, move || dispatch_later(weak.clone(), Input::AutoplayTick));
                state.borrow_mut().autoplay = Some(interval);
            }
            Effect::DisarmAutoplay => state.borrow_mut().autoplay = None,
            Effect::LoadImage(index) => state.borrow().load_image(index),
        }
    }
}

impl Attached {
    fn activate(&self, from: usize, to: usize, direction: Direction) {
        if from != to {
            let _ = self.root.class_list().add_1(CLASS_ANIMATING);
            if let Some(incoming) = self.slides.get(to) {
                match direction {
                    Direction::Next => {
                        let _ = incoming.class_list().add_1(CLASS_SLIDE_NEXT);
                    }
                    Direction::Prev => {
                        let _ = incoming.class_list().add_1(CLASS_SLIDE_PREV);
                    }
                    Direction::Jump => {}
                }
            }
        }

        for (index, slide) in self.slides.iter().enumerate() {
            let active = index == to;
            let _ = slide.class_list().toggle_with_force(CLASS_ACTIVE, active);
            let _ = slide.set_attribute("aria-hidden", if active { "false" } else { "true" });
        }
        for (index, indicator) in self.indicators.iter().enumerate() {
            let selected = index == to;
            let _ = indicator.class_list().toggle_with_force(CLASS_ACTIVE, selected);
            let _ = indicator.set_attribute("aria-selected", if selected { "true" } else { "false" });
        }
    }

    fn settled(&self) {
        let _ = self.root.class_list().remove_1(CLASS_ANIMATING);
        for slide in &self.slides {
            let _ = slide.class_list().remove_2(CLASS_SLIDE_NEXT, CLASS_SLIDE_PREV);
        }
    }

    fn load_image(&self, index: usize) {
        let Some(slide) = self.slides.get(index) else {
            return;
        };
        let Ok(Some(image)) = slide.query_selector(&format!("img[{ATTR_DEFERRED_SRC}]")) else {
            return;
        };
        if let Some(source) = image.get_attribute(ATTR_DEFERRED_SRC) {
            let _ = image.set_attribute("src", &source);
            let _ = image.remove_attribute(ATTR_DEFERRED_SRC);
            let _ = image.class_list().remove_1(CLASS_LAZY);
        }
    }
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
