use proptest::prelude::*;
use snapcrop_core::constraint::{AspectRatio, enforce};
use snapcrop_core::drag::Anchor;
use snapcrop_core::geometry::MIN_SIZE;
use snapcrop_core::{CropRect, CropSession, SessionEvent, Size};

const BOUNDS: Size = Size::new(800.0, 600.0);

fn ratio() -> impl Strategy<Value = AspectRatio> {
    (1u32..=20, 1u32..=20).prop_map(|(w, h)| AspectRatio::new(w as f64, h as f64).unwrap())
}

fn anchor() -> impl Strategy<Value = Anchor> {
    prop_oneof![
        Just(Anchor::TopLeft),
        Just(Anchor::TopRight),
        Just(Anchor::BottomLeft),
        Just(Anchor::BottomRight),
        Just(Anchor::Center),
    ]
}

fn any_rect() -> impl Strategy<Value = CropRect> {
    (-100.0..900.0f64, -100.0..700.0f64, -100.0..900.0f64, -100.0..700.0f64)
        .prop_map(|(x1, y1, x2, y2)| CropRect::new(x1, y1, x2, y2))
}

fn close(a: &CropRect, b: &CropRect) -> bool {
    [a.x1 - b.x1, a.y1 - b.y1, a.x2 - b.x2, a.y2 - b.y2]
        .iter()
        .all(|d| d.abs() < 1e-6)
}

proptest! {
    #[test]
    fn enforced_rect_is_bounded_and_proportioned(rect in any_rect(), r in ratio(), a in anchor()) {
        let out = enforce(&rect, r, a, BOUNDS);
        prop_assert!(out.is_normalized());
        prop_assert!(out.is_within(BOUNDS), "{} escaped the image", out);
        prop_assert!((out.width() / out.height() - r.value()).abs() < 1e-6);
    }

    #[test]
    fn enforced_rect_respects_minimum_size(rect in any_rect(), r in ratio(), a in anchor()) {
        let out = enforce(&rect, r, a, BOUNDS);
        prop_assert!(out.width() >= MIN_SIZE - 1e-9);
        prop_assert!(out.height() >= MIN_SIZE - 1e-9);
    }

    #[test]
    fn enforce_is_idempotent(rect in any_rect(), r in ratio(), a in anchor()) {
        let once = enforce(&rect, r, a, BOUNDS);
        let twice = enforce(&once, r, a, BOUNDS);
        prop_assert!(close(&once, &twice), "{} then {}", once, twice);
    }

    #[test]
    fn top_left_anchor_stays_put_when_nothing_is_clamped(
        x in 0.0..300.0f64,
        y in 0.0..300.0f64,
        w in 10.0..100.0f64,
        h in 10.0..100.0f64,
        (rw, rh) in (1u32..=2, 1u32..=2),
    ) {
        let r = AspectRatio::new(rw as f64, rh as f64).unwrap();
        let out = enforce(&CropRect::new(x, y, x + w, y + h), r, Anchor::TopLeft, BOUNDS);
        prop_assert_eq!(out.x1, x);
        prop_assert_eq!(out.y1, y);
    }

    #[test]
    fn session_rect_stays_on_image_after_every_move(
        start in (0.0..800.0f64, 0.0..600.0f64),
        moves in prop::collection::vec((-200.0..1000.0f64, -200.0..800.0f64), 1..20),
        constrained in any::<bool>(),
        r in ratio(),
    ) {
        let image = Size::new(1600.0, 1200.0);
        let mut s = CropSession::default();
        s.handle(SessionEvent::ImageChanged { width: image.width, height: image.height });
        s.handle(SessionEvent::ViewportResized { width: 800.0, height: 600.0 });
        if constrained {
            s.handle(SessionEvent::RatioChanged { ratio: Some(r) });
        }

        s.handle(SessionEvent::pointer_down(start.0, start.1));
        for (x, y) in moves {
            let out = s.handle(SessionEvent::PointerMove { x, y });
            let rect = out.rect.unwrap();
            prop_assert!(rect.is_within(image), "{} escaped after move to ({}, {})", rect, x, y);
            prop_assert!(!out.export_enabled);
        }
        let out = s.handle(SessionEvent::pointer_up(0.0, 0.0));
        prop_assert!(out.rect.unwrap().is_normalized());
    }
}
