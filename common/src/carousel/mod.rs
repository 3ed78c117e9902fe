//! Slideshow navigation state machine.
//!
//! The machine is pure: [`Carousel::handle`] maps an [`Input`] to a [`Transition`]
//! through [`Carousel::transition`] (the event table), applies it, and returns the
//! [`Effect`]s the host has to carry out (DOM updates, timers, image loads). The wasm
//! controller in the frontend owns the timers and feeds timer expiries back as inputs.
//!
//! States are `Idle(active)` and `Animating(from, to, direction)`. Navigation requests
//! that arrive while animating are dropped, never queued.

pub mod markup;

use crate::model::DEFAULT_INTERVAL_MS;

/// Duration of one slide transition.
pub const ANIMATION_MS: u32 = 500;
/// Minimum horizontal travel, in CSS pixels, for a drag to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
    /// Direct jump (indicator click); no directional styling.
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle {
        active: usize,
    },
    Animating {
        from: usize,
        to: usize,
        direction: Direction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Reasons autoplay is held back. Autoplay runs only while none of them applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    Hover,
    Focus,
    PageHidden,
}

/// Everything the host can report to the machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Next,
    Prev,
    GoTo(i64),
    AnimationFinished,
    AutoplayTick,
    PointerEnter,
    PointerLeave,
    FocusIn,
    /// Focus left the slideshow region entirely.
    FocusOut,
    PageHidden,
    PageVisible,
    SwipeStart { x: f64 },
    SwipeEnd { x: f64 },
    Key(Key),
}

impl Input {
    /// Maps a DOM pointer press (`down`) or release to a swipe input.
    ///
    /// Touch pointers are ignored here; the host reports them through touch events.
    pub fn from_pointer(pointer_type: &str, down: bool, x: f64) -> Option<Self> {
        match (pointer_type, down) {
            ("touch", _) => None,
            (_, true) => Some(Input::SwipeStart { x }),
            (_, false) => Some(Input::SwipeEnd { x }),
        }
    }
}

/// The state change an input maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Navigate { target: i64, direction: Direction },
    Settle,
    Hold(Hold),
    Release(Hold),
    BeginSwipe(f64),
    FinishSwipe(Option<Direction>),
    Ignore,
}

/// Work the host performs on behalf of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Show slide `to`: move the track, update active classes, `aria-hidden` on slides and
    /// `aria-selected` on indicators. `from == to` only on attach.
    Activate {
        from: usize,
        to: usize,
        direction: Direction,
    },
    /// Report `AnimationFinished` after the given delay.
    ScheduleSettle(u32),
    /// Cancel a pending `ScheduleSettle`.
    CancelSettle,
    /// The animation lock was released on `active`.
    Settled { active: usize },
    /// Start a repeating `AutoplayTick` with the given period.
    ArmAutoplay(u32),
    /// Stop the repeating `AutoplayTick`.
    DisarmAutoplay,
    /// Move the deferred source of this slide's image into `src`.
    LoadImage(usize),
}

/// Declarative settings read from the rendered markup at attach time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselConfig {
    pub slide_count: usize,
    pub autoplay: bool,
    pub interval_ms: u32,
}

impl CarouselConfig {
    /// Builds a config from the raw `data-autoplay` / `data-interval` attribute values.
    /// Missing or malformed values fall back to defaults instead of failing.
    pub fn from_attributes(
        slide_count: usize,
        autoplay: Option<&str>,
        interval: Option<&str>,
    ) -> Self {
        let autoplay = match autoplay.map(str::trim) {
            Some("false") | Some("0") | Some("off") => false,
            Some(_) | None => true,
        };
        let interval_ms = interval
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_INTERVAL_MS);
        Self {
            slide_count,
            autoplay,
            interval_ms,
        }
    }
}

/// Runtime state of one attached slideshow.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    config: CarouselConfig,
    phase: Phase,
    autoplay_armed: bool,
    hovered: bool,
    focused: bool,
    page_hidden: bool,
    touch_start: Option<f64>,
    loaded: Vec<bool>,
}

/// `((index mod count) + count) mod count`; `count` must be positive.
pub fn wrap_index(index: i64, count: usize) -> usize {
    let count = count as i64;
    (((index % count) + count) % count) as usize
}

impl Carousel {
    /// Creates the machine in `Idle(0)` and returns the effects of attaching it.
    pub fn attach(config: CarouselConfig) -> (Self, Vec<Effect>) {
        let mut carousel = Self {
            config,
            phase: Phase::Idle { active: 0 },
            autoplay_armed: false,
            hovered: false,
            focused: false,
            page_hidden: false,
            touch_start: None,
            loaded: vec![false; config.slide_count],
        };

        let mut effects = Vec::new();
        if config.slide_count == 0 {
            return (carousel, effects);
        }
        effects.push(Effect::Activate {
            from: 0,
            to: 0,
            direction: Direction::Jump,
        });
        carousel.preload_around(0, &mut effects);
        if carousel.autoplay_allowed() {
            carousel.autoplay_armed = true;
            effects.push(Effect::ArmAutoplay(config.interval_ms));
        }
        (carousel, effects)
    }

    /// Effects needed to release every timer before the markup goes away.
    pub fn detach(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Phase::Animating { to, .. } = self.phase {
            self.phase = Phase::Idle { active: to };
            effects.push(Effect::CancelSettle);
        }
        if self.autoplay_armed {
            self.autoplay_armed = false;
            effects.push(Effect::DisarmAutoplay);
        }
        effects
    }

    pub fn config(&self) -> CarouselConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The slide currently shown (the target while animating).
    pub fn active(&self) -> usize {
        match self.phase {
            Phase::Idle { active } => active,
            Phase::Animating { to, .. } => to,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    pub fn autoplay_armed(&self) -> bool {
        self.autoplay_armed
    }

    /// Whether assistive technology should skip slide `index`.
    pub fn is_slide_hidden(&self, index: usize) -> bool {
        index != self.active()
    }

    pub fn is_indicator_selected(&self, index: usize) -> bool {
        self.config.slide_count > 0 && index == self.active()
    }

    /// The event table: which transition an input stands for in the current state.
    pub fn transition(&self, input: Input) -> Transition {
        let active = self.active() as i64;
        match input {
            Input::Next | Input::AutoplayTick | Input::Key(Key::ArrowRight) => {
                Transition::Navigate {
                    target: active + 1,
                    direction: Direction::Next,
                }
            }
            Input::Prev | Input::Key(Key::ArrowLeft) => Transition::Navigate {
                target: active - 1,
                direction: Direction::Prev,
            },
            Input::GoTo(index) => Transition::Navigate {
                target: index,
                direction: Direction::Jump,
            },
            Input::Key(Key::Other) => Transition::Ignore,
            Input::AnimationFinished => Transition::Settle,
            Input::PointerEnter => Transition::Hold(Hold::Hover),
            Input::PointerLeave => Transition::Release(Hold::Hover),
            Input::FocusIn => Transition::Hold(Hold::Focus),
            Input::FocusOut => Transition::Release(Hold::Focus),
            Input::PageHidden => Transition::Hold(Hold::PageHidden),
            Input::PageVisible => Transition::Release(Hold::PageHidden),
            Input::SwipeStart { x } => Transition::BeginSwipe(x),
            Input::SwipeEnd { x } => Transition::FinishSwipe(self.swipe_direction(x)),
        }
    }

    /// Applies one input and returns the resulting effects.
    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.config.slide_count == 0 {
            return effects;
        }

        match self.transition(input) {
            Transition::Navigate { target, direction } => {
                self.navigate(target, direction, &mut effects)
            }
            Transition::Settle => {
                if let Phase::Animating { to, .. } = self.phase {
                    self.phase = Phase::Idle { active: to };
                    effects.push(Effect::Settled { active: to });
                }
            }
            Transition::Hold(hold) => {
                self.set_hold(hold, true);
                if self.autoplay_armed && !self.autoplay_allowed() {
                    self.autoplay_armed = false;
                    effects.push(Effect::DisarmAutoplay);
                }
            }
            Transition::Release(hold) => {
                self.set_hold(hold, false);
                if !self.autoplay_armed && self.autoplay_allowed() {
                    self.autoplay_armed = true;
                    effects.push(Effect::ArmAutoplay(self.config.interval_ms));
                }
            }
            Transition::BeginSwipe(x) => self.touch_start = Some(x),
            Transition::FinishSwipe(direction) => {
                self.touch_start = None;
                match direction {
                    Some(Direction::Next) => {
                        self.navigate(self.active() as i64 + 1, Direction::Next, &mut effects)
                    }
                    Some(Direction::Prev) => {
                        self.navigate(self.active() as i64 - 1, Direction::Prev, &mut effects)
                    }
                    Some(Direction::Jump) | None => {}
                }
            }
            Transition::Ignore => {}
        }
        effects
    }

    fn swipe_direction(&self, end_x: f64) -> Option<Direction> {
        let start = self.touch_start?;
        let delta = end_x - start;
        if delta.abs() <= SWIPE_THRESHOLD_PX {
            None
        } else if delta < 0.0 {
            Some(Direction::Next)
        } else {
            Some(Direction::Prev)
        }
    }

    fn navigate(&mut self, target: i64, direction: Direction, effects: &mut Vec<Effect>) {
        let Phase::Idle { active } = self.phase else {
            return;
        };
        let to = wrap_index(target, self.config.slide_count);
        if to == active {
            return;
        }

        self.phase = Phase::Animating {
            from: active,
            to,
            direction,
        };
        effects.push(Effect::Activate {
            from: active,
            to,
            direction,
        });
        effects.push(Effect::ScheduleSettle(ANIMATION_MS));
        self.preload_around(to, effects);

        if self.autoplay_armed {
            effects.push(Effect::DisarmAutoplay);
            effects.push(Effect::ArmAutoplay(self.config.interval_ms));
        }
    }

    fn preload_around(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let count = self.config.slide_count;
        for candidate in [index, wrap_index(index as i64 + 1, count)] {
            if let Some(loaded) = self.loaded.get_mut(candidate) {
                if !*loaded {
                    *loaded = true;
                    effects.push(Effect::LoadImage(candidate));
                }
            }
        }
    }

    fn set_hold(&mut self, hold: Hold, value: bool) {
        match hold {
            Hold::Hover => self.hovered = value,
            Hold::Focus => self.focused = value,
            Hold::PageHidden => self.page_hidden = value,
        }
    }

    fn autoplay_allowed(&self) -> bool {
        self.config.autoplay
            && self.config.slide_count > 1
            && !self.hovered
            && !self.focused
            && !self.page_hidden
    }
}

#[cfg(test)]
mod tests;
