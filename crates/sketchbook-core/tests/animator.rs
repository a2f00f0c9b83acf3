use sketchbook_core::{
    AnimationState, Animator, FrameOutcome, FrameQueue, Shape, ShapeCollection,
};

/// Fire frames until nothing is pending, returning how many frames ran.
fn run_to_completion(animator: &mut Animator<FrameQueue>, shapes: &mut ShapeCollection) -> usize {
    let mut frames = 0;
    loop {
        let fired = animator.scheduler_mut().fire();
        if fired.is_empty() {
            return frames;
        }
        for token in fired {
            if animator.run_frame(token, shapes) != FrameOutcome::Stale {
                frames += 1;
            }
        }
        assert!(frames < 10_000, "animation never converged");
    }
}

#[test]
fn start_then_converge_returns_to_idle() {
    let mut animator = Animator::new(FrameQueue::new());
    let mut shapes = ShapeCollection::from_items(vec![
        Shape::new(0.0, 0.0, 0.0)
            .with_target(10.0, 0.0)
            .with_target_rotation(0.0)
            .with_ease(0.5),
    ]);

    let token = animator.start(&shapes).expect("non-empty collection starts");
    assert_eq!(animator.state(shapes.id()), AnimationState::Running);
    assert_eq!(animator.token(shapes.id()), Some(token));

    // First frame halves the gap.
    let fired = animator.scheduler_mut().fire();
    assert_eq!(fired, vec![token]);
    assert!(matches!(
        animator.run_frame(token, &mut shapes),
        FrameOutcome::Pending(_)
    ));
    assert_eq!(shapes.as_slice()[0].x, 5.0);

    run_to_completion(&mut animator, &mut shapes);
    assert_eq!(shapes.as_slice()[0].x, 10.0);
    assert_eq!(animator.state(shapes.id()), AnimationState::Idle);
    assert_eq!(animator.active(), 0);
    assert_eq!(animator.scheduler().pending(), 0);
}

#[test]
fn stop_without_start_is_false() {
    let mut animator = Animator::new(FrameQueue::new());
    let shapes = ShapeCollection::from_items(vec![Shape::new(0.0, 0.0, 0.0)]);
    assert!(!animator.stop(&shapes));
}

#[test]
fn start_on_empty_collection_registers_nothing() {
    let mut animator = Animator::new(FrameQueue::new());
    let shapes: ShapeCollection = ShapeCollection::new();

    assert_eq!(animator.start(&shapes), None);
    assert_eq!(animator.active(), 0);
    assert_eq!(animator.scheduler().pending(), 0);
}

#[test]
fn second_start_supersedes_the_first() {
    let mut animator = Animator::new(FrameQueue::new());
    let shapes =
        ShapeCollection::from_items(vec![Shape::new(0.0, 0.0, 0.0).with_target(50.0, 50.0)]);

    let first = animator.start(&shapes).unwrap();
    let second = animator.start(&shapes).unwrap();

    assert_ne!(first, second);
    assert_eq!(animator.active(), 1);
    assert_eq!(animator.scheduler().pending(), 1);
    assert!(animator.scheduler().is_pending(second));
    assert!(!animator.scheduler().is_pending(first));
}

#[test]
fn stale_frame_does_not_touch_shapes() {
    let mut animator = Animator::new(FrameQueue::new());
    let mut shapes =
        ShapeCollection::from_items(vec![Shape::new(0.0, 0.0, 0.0).with_target(50.0, 0.0)]);

    let old = animator.start(&shapes).unwrap();
    let new = animator.start(&shapes).unwrap();

    // A host whose scheduler could not cancel synchronously fires the old token anyway.
    assert_eq!(animator.run_frame(old, &mut shapes), FrameOutcome::Stale);
    assert_eq!(shapes.as_slice()[0].x, 0.0);
    assert_eq!(animator.token(shapes.id()), Some(new));

    // After stopping, even the current token is stale.
    animator.stop(&shapes);
    assert_eq!(animator.run_frame(new, &mut shapes), FrameOutcome::Stale);
    assert_eq!(shapes.as_slice()[0].x, 0.0);
}

#[test]
fn keeps_running_until_every_shape_arrives() {
    let mut animator = Animator::new(FrameQueue::new());
    let mut shapes = ShapeCollection::from_items(vec![
        Shape::new(5.0, 5.0, 0.0).with_target(5.0, 5.0),
        Shape::new(0.0, 0.0, 0.0).with_target(100.0, 0.0).with_ease(0.1),
    ]);

    animator.start(&shapes);
    let frames = run_to_completion(&mut animator, &mut shapes);

    assert!(frames > 1);
    assert!(shapes.all_arrived());
    assert_eq!(shapes.as_slice()[1].x, 100.0);
    assert_eq!(animator.state(shapes.id()), AnimationState::Idle);
}

#[test]
fn collections_animate_independently() {
    let mut animator = Animator::new(FrameQueue::new());
    let mut near = ShapeCollection::from_items(vec![
        Shape::new(0.0, 0.0, 0.0).with_target(1.0, 0.0).with_ease(1.0),
    ]);
    let far = ShapeCollection::from_items(vec![Shape::new(0.0, 0.0, 0.0).with_target(90.0, 0.0)]);

    animator.start(&near);
    animator.start(&far);
    assert_eq!(animator.active(), 2);

    assert!(animator.stop(&far));
    run_to_completion(&mut animator, &mut near);

    assert_eq!(near.as_slice()[0].x, 1.0);
    assert_eq!(far.as_slice()[0].x, 0.0);
    assert_eq!(animator.active(), 0);
}

#[test]
fn far_away_shapes_still_finish() {
    let far = 2f64.powi(53);
    let mut animator = Animator::new(FrameQueue::new());
    let mut shapes = ShapeCollection::from_items(vec![
        Shape::new(far, -far, 0.0).with_target(far + 2.0, -far - 2.0),
    ]);

    animator.start(&shapes);
    run_to_completion(&mut animator, &mut shapes);

    assert_eq!(animator.state(shapes.id()), AnimationState::Idle);
    assert_eq!(shapes.as_slice()[0].x, far + 2.0);
    assert_eq!(shapes.as_slice()[0].y, -far - 2.0);
}
