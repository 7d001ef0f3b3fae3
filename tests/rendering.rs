//! Full repaints onto the software rasterizer.

use papercut::canvas::{Canvas, Command};
use papercut::geometry::Point;
use papercut::preview::PreviewSheet;
use papercut::types::FragmentDescriptor;
use papercut::ui::surface::FixedAdvance;
use papercut::ui::{Backdrop, PixelSurface, RenderPipeline};

fn page_canvas(seed: u64) -> (Canvas, PixelSurface) {
    let mut canvas = Canvas::new(seed);
    canvas
        .apply(Command::Resize { width: 400., height: 400. }, &mut FixedAdvance::default())
        .unwrap();
    let (w, h) = canvas.size().unwrap();
    let surface = PixelSurface::new(w.round() as usize, h.round() as usize);
    (canvas, surface)
}

fn alpha(px: u32) -> u32 {
    px >> 24
}

#[test]
fn test_empty_plain_page_stays_transparent() {
    let (canvas, mut surface) = page_canvas(1);
    let report = RenderPipeline::new(1).render(&canvas, &mut surface);
    assert_eq!(report.drawn, 0);
    assert!(surface.pixels().iter().all(|px| *px == 0));
}

#[test]
fn test_fragment_paints_paper_under_its_centre() {
    let (mut canvas, mut surface) = page_canvas(2);
    canvas
        .place(FragmentDescriptor::new("f1", "明月", "唐诗"), Point::new(150., 150.))
        .unwrap();
    let report = RenderPipeline::new(2).render(&canvas, &mut surface);

    assert_eq!(report.drawn, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(surface.depth(), 0);
    assert!(alpha(surface.pixel(150, 150).unwrap()) > 200);
    assert_eq!(surface.pixel(5, 5), Some(0));
}

#[test]
fn test_paper_backdrop_covers_whole_page() {
    let (mut canvas, mut surface) = page_canvas(3);
    canvas
        .apply(Command::SetBackdrop(Backdrop::Paper), &mut FixedAdvance::default())
        .unwrap();
    RenderPipeline::new(3).render(&canvas, &mut surface);
    assert!(surface.pixels().iter().all(|px| alpha(*px) > 0));
}

#[test]
fn test_grid_lines_follow_toggle() {
    let (mut canvas, mut surface) = page_canvas(4);
    let mut pipeline = RenderPipeline::new(4);
    canvas
        .apply(Command::SetGrid(true), &mut FixedAdvance::default())
        .unwrap();
    pipeline.render(&canvas, &mut surface);
    let painted = surface.pixels().iter().filter(|px| alpha(**px) > 0).count();
    assert!(painted > 0);

    canvas
        .apply(Command::SetGrid(false), &mut FixedAdvance::default())
        .unwrap();
    pipeline.render(&canvas, &mut surface);
    assert!(surface.pixels().iter().all(|px| *px == 0));
}

#[test]
fn test_preview_sheet_exports_png() {
    let mut sheet = PreviewSheet::new(5);
    sheet.regenerate();
    let (w, h) = PreviewSheet::size();
    let mut surface = PixelSurface::new(w as usize, h as usize);
    sheet.render(&mut surface);

    let origin = PreviewSheet::tile_origin(0);
    let centre = surface
        .pixel(origin.x as usize + 100, origin.y as usize + 60)
        .unwrap();
    assert!(alpha(centre) > 0);
    assert_eq!(surface.pixel(2, 2), Some(0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview.png");
    surface.save_png(&path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
