use super::*;

fn carousel(slides: usize, autoplay: bool) -> (Carousel, Vec<Effect>) {
    Carousel::attach(CarouselConfig {
        slide_count: slides,
        autoplay,
        interval_ms: 5000,
    })
}

fn activations(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Activate { .. }))
        .count()
}

fn settle(c: &mut Carousel) {
    c.handle(Input::AnimationFinished);
}

#[test]
fn attach_starts_idle_on_first_slide_and_preloads_next() {
    let (c, effects) = carousel(3, true);
    assert_eq!(c.phase(), Phase::Idle { active: 0 });
    assert_eq!(
        effects,
        vec![
            Effect::Activate {
                from: 0,
                to: 0,
                direction: Direction::Jump
            },
            Effect::LoadImage(0),
            Effect::LoadImage(1),
            Effect::ArmAutoplay(5000),
        ]
    );
}

#[test]
fn goto_wraps_any_integer_index() {
    for index in -12i64..12 {
        let (mut c, _) = carousel(5, false);
        c.handle(Input::GoTo(index));
        let expected = (((index % 5) + 5) % 5) as usize;
        assert_eq!(c.active(), expected, "goTo({index})");
    }

    let (mut c, _) = carousel(5, false);
    c.handle(Input::GoTo(-1));
    assert_eq!(c.active(), 4);
    settle(&mut c);
    c.handle(Input::GoTo(5));
    assert_eq!(c.active(), 0);
}

#[test]
fn second_goto_while_animating_is_dropped() {
    let (mut c, _) = carousel(5, false);
    let first = c.handle(Input::GoTo(2));
    let second = c.handle(Input::GoTo(4));

    assert_eq!(activations(&first), 1);
    assert!(second.is_empty());
    assert_eq!(
        c.phase(),
        Phase::Animating {
            from: 0,
            to: 2,
            direction: Direction::Jump
        }
    );

    assert_eq!(
        c.handle(Input::AnimationFinished),
        vec![Effect::Settled { active: 2 }]
    );
    assert_eq!(activations(&c.handle(Input::GoTo(4))), 1);
    assert_eq!(c.active(), 4);
}

#[test]
fn goto_active_slide_leaves_autoplay_running() {
    let (mut c, _) = carousel(4, true);
    c.handle(Input::GoTo(2));
    settle(&mut c);

    assert!(c.handle(Input::GoTo(2)).is_empty());
    assert!(c.handle(Input::GoTo(6)).is_empty());
    assert_eq!(c.phase(), Phase::Idle { active: 2 });

    let tick = c.handle(Input::AutoplayTick);
    assert_eq!(activations(&tick), 1);
    assert_eq!(c.active(), 3);
}

#[test]
fn navigation_schedules_settle_and_restarts_autoplay() {
    let (mut c, _) = carousel(3, true);
    let effects = c.handle(Input::Next);
    assert_eq!(
        effects,
        vec![
            Effect::Activate {
                from: 0,
                to: 1,
                direction: Direction::Next
            },
            Effect::ScheduleSettle(ANIMATION_MS),
            Effect::LoadImage(2),
            Effect::DisarmAutoplay,
            Effect::ArmAutoplay(5000),
        ]
    );
}

#[test]
fn prev_from_first_slide_wraps_to_last() {
    let (mut c, _) = carousel(4, false);
    let effects = c.handle(Input::Prev);
    assert_eq!(
        effects[0],
        Effect::Activate {
            from: 0,
            to: 3,
            direction: Direction::Prev
        }
    );
}

#[test]
fn autoplay_never_arms_with_one_or_zero_slides() {
    for count in [0, 1] {
        let (mut c, effects) = carousel(count, true);
        assert!(!effects.contains(&Effect::ArmAutoplay(5000)));
        assert!(!c.autoplay_armed());

        let effects = c.handle(Input::PointerLeave);
        assert!(effects.is_empty());
        assert!(!c.autoplay_armed());
    }
}

#[test]
fn zero_slides_are_inert() {
    let (mut c, effects) = carousel(0, true);
    assert!(effects.is_empty());
    for input in [Input::Next, Input::GoTo(3), Input::AutoplayTick, Input::SwipeEnd { x: 0.0 }] {
        assert!(c.handle(input).is_empty());
    }
    assert!(!c.is_indicator_selected(0));
}

#[test]
fn hover_focus_and_visibility_hold_autoplay() {
    let (mut c, _) = carousel(3, true);

    assert_eq!(c.handle(Input::PointerEnter), vec![Effect::DisarmAutoplay]);
    assert!(c.handle(Input::FocusIn).is_empty());
    assert!(c.handle(Input::PointerLeave).is_empty());
    assert!(!c.autoplay_armed());

    assert_eq!(c.handle(Input::FocusOut), vec![Effect::ArmAutoplay(5000)]);
    assert_eq!(c.handle(Input::PageHidden), vec![Effect::DisarmAutoplay]);
    assert_eq!(c.handle(Input::PageVisible), vec![Effect::ArmAutoplay(5000)]);
}

#[test]
fn disabled_autoplay_stays_disarmed() {
    let (mut c, effects) = carousel(3, false);
    assert!(!effects.contains(&Effect::ArmAutoplay(5000)));
    c.handle(Input::PointerEnter);
    assert!(c.handle(Input::PointerLeave).is_empty());
    assert!(!c.handle(Input::Next).contains(&Effect::DisarmAutoplay));
}

#[test]
fn autoplay_tick_advances_but_not_during_animation() {
    let (mut c, _) = carousel(3, true);
    c.handle(Input::AutoplayTick);
    assert_eq!(c.active(), 1);
    assert!(c.handle(Input::AutoplayTick).is_empty());
    settle(&mut c);
    c.handle(Input::AutoplayTick);
    assert_eq!(c.active(), 2);
}

#[test]
fn short_swipe_changes_nothing() {
    let (mut c, _) = carousel(3, false);
    c.handle(Input::SwipeStart { x: 200.0 });
    assert!(c.handle(Input::SwipeEnd { x: 170.0 }).is_empty());
    assert_eq!(c.phase(), Phase::Idle { active: 0 });

    c.handle(Input::SwipeStart { x: 200.0 });
    assert!(c.handle(Input::SwipeEnd { x: 250.0 }).is_empty());
}

#[test]
fn swipe_direction_maps_to_next_and_prev() {
    let (mut c, _) = carousel(3, false);
    c.handle(Input::SwipeStart { x: 300.0 });
    c.handle(Input::SwipeEnd { x: 200.0 });
    assert_eq!(c.active(), 1);
    settle(&mut c);

    c.handle(Input::SwipeStart { x: 100.0 });
    c.handle(Input::SwipeEnd { x: 180.0 });
    assert_eq!(c.active(), 0);
}

#[test]
fn swipe_end_without_start_is_ignored() {
    let (mut c, _) = carousel(3, false);
    assert!(c.handle(Input::SwipeEnd { x: 0.0 }).is_empty());
}

#[test]
fn mouse_and_pen_drags_swipe_but_touch_pointers_are_left_to_touch_events() {
    assert_eq!(Input::from_pointer("touch", true, 10.0), None);
    assert_eq!(Input::from_pointer("touch", false, 10.0), None);

    let (mut c, _) = carousel(3, false);
    for (start, end) in [("mouse", "mouse"), ("pen", "pen")] {
        let press = Input::from_pointer(start, true, 300.0).expect("press");
        let release = Input::from_pointer(end, false, 120.0).expect("release");
        c.handle(press);
        c.handle(release);
        settle(&mut c);
    }
    assert_eq!(c.active(), 2);

    c.handle(Input::from_pointer("mouse", true, 100.0).expect("press"));
    assert!(c.handle(Input::from_pointer("mouse", false, 120.0).expect("release")).is_empty());
    assert_eq!(c.phase(), Phase::Idle { active: 2 });
}

#[test]
fn arrow_keys_map_to_prev_and_next() {
    let (c, _) = carousel(3, false);
    assert_eq!(
        c.transition(Input::Key(Key::from_name("ArrowRight"))),
        Transition::Navigate {
            target: 1,
            direction: Direction::Next
        }
    );
    assert_eq!(
        c.transition(Input::Key(Key::from_name("ArrowLeft"))),
        Transition::Navigate {
            target: -1,
            direction: Direction::Prev
        }
    );
    assert_eq!(c.transition(Input::Key(Key::from_name("Enter"))), Transition::Ignore);
}

#[test]
fn exactly_one_slide_is_exposed_to_assistive_tech() {
    let (mut c, _) = carousel(4, false);
    c.handle(Input::GoTo(2));
    let visible: Vec<usize> = (0..4).filter(|i| !c.is_slide_hidden(*i)).collect();
    let selected: Vec<usize> = (0..4).filter(|i| c.is_indicator_selected(*i)).collect();
    assert_eq!(visible, vec![2]);
    assert_eq!(selected, vec![2]);
}

#[test]
fn images_are_loaded_once() {
    let (mut c, _) = carousel(3, false);
    let effects = c.handle(Input::Next);
    assert!(effects.contains(&Effect::LoadImage(2)));
    assert!(!effects.contains(&Effect::LoadImage(1)));
    settle(&mut c);
    let effects = c.handle(Input::Next);
    assert!(!effects.iter().any(|e| matches!(e, Effect::LoadImage(_))));
}

#[test]
fn detach_releases_timers() {
    let (mut c, _) = carousel(3, true);
    c.handle(Input::Next);
    assert_eq!(
        c.detach(),
        vec![Effect::CancelSettle, Effect::DisarmAutoplay]
    );
    assert!(c.detach().is_empty());
}

#[test]
fn config_reads_declarative_attributes() {
    let cfg = CarouselConfig::from_attributes(3, Some("false"), Some("2500"));
    assert!(!cfg.autoplay);
    assert_eq!(cfg.interval_ms, 2500);

    let cfg = CarouselConfig::from_attributes(3, None, Some("soon"));
    assert!(cfg.autoplay);
    assert_eq!(cfg.interval_ms, DEFAULT_INTERVAL_MS);

    let cfg = CarouselConfig::from_attributes(3, Some("true"), Some("0"));
    assert_eq!(cfg.interval_ms, DEFAULT_INTERVAL_MS);
}
