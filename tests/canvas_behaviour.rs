//! End-to-end canvas behaviour through the public command API.

use papercut::canvas::{Canvas, Command, FontSize, NudgeDirection};
use papercut::geometry::{Point, EDGE_POINT_COUNT};
use papercut::types::FragmentDescriptor;
use papercut::ui::surface::FontSpec;

fn forty(_: &str, _: &FontSpec) -> f32 {
    40.
}

fn sized_canvas(seed: u64) -> Canvas {
    let mut canvas = Canvas::new(seed);
    canvas
        .apply(Command::Resize { width: 1000., height: 1000. }, &mut forty)
        .unwrap();
    canvas
}

fn add(canvas: &mut Canvas, text: &str, x: f32, y: f32) {
    canvas
        .apply(
            Command::Add {
                descriptor: FragmentDescriptor::new("t", text, "唐诗"),
                at: Point::new(x, y),
            },
            &mut forty,
        )
        .unwrap();
}

#[test]
fn test_first_placement() {
    let mut canvas = sized_canvas(11);
    add(&mut canvas, "明月", 50., 60.);

    let fragment = &canvas.fragments()[0];
    assert_eq!(fragment.text(), "明月");
    assert_eq!(fragment.position(), Point::new(50., 60.));
    assert_eq!(fragment.scale(), 1.);
    assert_eq!(fragment.z_index(), 1);
    assert!((-5. ..=5.).contains(&fragment.rotation()));
    assert_eq!(fragment.look().edge().points().len(), EDGE_POINT_COUNT);
    let modifier = fragment.look().style().font.size_modifier;
    assert!((0.85..=1.15).contains(&modifier));
}

#[test]
fn test_hit_box_uses_measured_width() {
    let mut canvas = sized_canvas(1);
    add(&mut canvas, "明月", 100., 100.);
    canvas.apply(Command::Select(None), &mut forty).unwrap();

    canvas.apply(Command::PointerDown(Point::new(200., 200.)), &mut forty).unwrap();
    assert!(canvas.selected().is_none());

    canvas.apply(Command::PointerDown(Point::new(110., 105.)), &mut forty).unwrap();
    assert_eq!(canvas.selected().map(|f| f.text()), Some("明月"));
}

#[test]
fn test_selection_raises_above_all() {
    let mut canvas = sized_canvas(2);
    add(&mut canvas, "一", 100., 100.);
    add(&mut canvas, "二", 300., 300.);
    add(&mut canvas, "三", 500., 500.);

    let first = canvas.fragments()[0].id();
    let others_max = canvas
        .fragments()
        .iter()
        .filter(|f| f.id() != first)
        .map(|f| f.z_index())
        .max()
        .unwrap();
    canvas.apply(Command::Select(Some(first)), &mut forty).unwrap();
    assert!(canvas.fragment(first).unwrap().z_index() > others_max);
    assert_eq!(canvas.draw_order().last().unwrap().id(), first);
}

#[test]
fn test_resize_maps_positions_and_keeps_looks() {
    let mut canvas = sized_canvas(3);
    add(&mut canvas, "清泉", 100., 200.);
    let (w, h) = canvas.size().unwrap();
    let before = canvas.fragments()[0].clone();

    canvas
        .apply(Command::Resize { width: 500., height: 500. }, &mut forty)
        .unwrap();
    let (w2, h2) = canvas.size().unwrap();
    let after = &canvas.fragments()[0];

    let expected = Point::new(100. * w2 / w, 200. * h2 / h);
    assert!(after.position().distance(expected) < 1e-3);
    assert_eq!(after.look(), before.look());
}

#[test]
fn test_malformed_payload_leaves_canvas_untouched() {
    let mut canvas = sized_canvas(4);
    add(&mut canvas, "红豆", 100., 100.);
    let fragments = canvas.fragments().to_vec();
    let selected = canvas.selected_id();

    assert!(canvas.drop_payload("{not json", Point::new(10., 10.)).is_err());
    assert!(canvas.drop_payload(r#"{"id":"x"}"#, Point::new(10., 10.)).is_err());

    assert_eq!(canvas.fragments(), fragments.as_slice());
    assert_eq!(canvas.selected_id(), selected);
}

#[test]
fn test_valid_payload_places_fragment() {
    let mut canvas = sized_canvas(5);
    let id = canvas
        .drop_payload(r#"{"id":"f9","text":"细雨","source":"宋词"}"#, Point::new(30., 40.))
        .unwrap();
    let fragment = canvas.fragment(id).unwrap();
    assert_eq!(fragment.tray_id(), "f9");
    assert_eq!(fragment.source(), "宋词");
}

#[test]
fn test_same_seed_same_looks() {
    let mut a = sized_canvas(99);
    let mut b = sized_canvas(99);
    for canvas in [&mut a, &mut b] {
        add(canvas, "松间照", 10., 10.);
        add(canvas, "石上流", 20., 20.);
    }
    for (fa, fb) in a.fragments().iter().zip(b.fragments()) {
        assert_eq!(fa.look(), fb.look());
        assert_eq!(fa.rotation(), fb.rotation());
    }
}

#[test]
fn test_gesture_sequence() {
    let mut canvas = sized_canvas(6);
    add(&mut canvas, "春来", 100., 100.);
    let id = canvas.selected_id().unwrap();

    canvas.apply(Command::Pinch(100.), &mut forty).unwrap();
    assert_eq!(canvas.fragment(id).unwrap().scale(), 3.);
    canvas.apply(Command::Pinch(0.01), &mut forty).unwrap();
    assert_eq!(canvas.fragment(id).unwrap().scale(), 0.5);

    canvas.apply(Command::Nudge(NudgeDirection::Right), &mut forty).unwrap();
    canvas.apply(Command::Nudge(NudgeDirection::Up), &mut forty).unwrap();
    assert_eq!(canvas.fragment(id).unwrap().position(), Point::new(105., 95.));

    canvas.apply(Command::Delete, &mut forty).unwrap();
    assert!(canvas.fragments().is_empty());
    assert!(canvas.selected().is_none());
}

#[test]
fn test_large_font_widens_hit_band() {
    let mut canvas = sized_canvas(7);
    add(&mut canvas, "花落", 100., 100.);
    canvas.apply(Command::Select(None), &mut forty).unwrap();

    // Small hit height is 30, so 20 below the centre misses
    canvas.apply(Command::PointerDown(Point::new(100., 120.)), &mut forty).unwrap();
    assert!(canvas.selected().is_none());

    canvas.apply(Command::SetFontSize(FontSize::Large), &mut forty).unwrap();
    canvas.apply(Command::PointerDown(Point::new(100., 120.)), &mut forty).unwrap();
    assert!(canvas.selected().is_some());
}
