use lifegrid_core::{CellCoord, GridDimensions, GridSnapshot};
use lifegrid_rendering::{Frame, Glyphs, RenderingBackend};
use lifegrid_rendering_terminal::TerminalBackend;

fn frame(generation: u64) -> Frame {
    let dimensions = GridDimensions::new(2, 3).expect("dimensions");
    let snapshot = GridSnapshot::from_live_cells(dimensions, [CellCoord::new(0, 1)]);
    Frame::compose(generation, snapshot.view(), &Glyphs::default())
}

fn output(backend: &TerminalBackend<Vec<u8>>) -> String {
    String::from_utf8(backend.writer().clone()).expect("utf-8 output")
}

#[test]
fn present_clears_before_drawing() {
    let mut backend = TerminalBackend::new(Vec::new());
    backend.present(&frame(3)).expect("present");

    let text = output(&backend);
    let clear = text.find("\x1b[2J").expect("clear sequence");
    let grid = text.find(". o . \n. . . \n").expect("grid text");
    assert!(clear < grid);
    assert!(text.ends_with("generation 3  population 1\n"));
}

#[test]
fn every_frame_is_drawn_from_scratch() {
    let mut backend = TerminalBackend::new(Vec::new());
    backend.present(&frame(1)).expect("present");
    backend.present(&frame(2)).expect("present");

    let text = output(&backend);
    assert_eq!(text.matches("\x1b[2J").count(), 2);
    assert!(text.contains("generation 1"));
    assert!(text.ends_with("generation 2  population 1\n"));
}
