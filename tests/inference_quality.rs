use std::cell::RefCell;
use std::rc::Rc;

use stylish::capture::CapturedFrame;
use stylish::inference::{StyleInference, StyleModel, StyleTransfer, Tensor};
use stylish::style::{OwnedStyle, StyleDescriptor};
use stylish::{QualityRange, Size, StylishResult};

/// Identity model that records the sizes it receives.
struct Recorder(Rc<RefCell<Vec<Size>>>);

impl StyleModel for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }
    fn stylize(&mut self, content: &Tensor, _style: &StyleDescriptor<'_>) -> StylishResult<Tensor> {
        self.0.borrow_mut().push(content.size);
        Ok(content.clone())
    }
}

fn frame(width: u32, height: u32) -> CapturedFrame {
    CapturedFrame::from_bgra(vec![128; (width * height * 4) as usize], width, height).unwrap()
}

#[test]
fn test_model_size_per_quality_factor() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut transfer = StyleTransfer::new(Box::new(Recorder(seen.clone())));
    let style = OwnedStyle::solid([0.5; 3], 4, 4);

    for quality in 0..=3 {
        transfer.set_quality_factor(quality);
        let out = transfer.run(&frame(640, 480), &style.descriptor()).unwrap().unwrap();
        assert_eq!(out.frame.size(), Size::new(640, 480));
    }
    assert_eq!(
        *seen.borrow(),
        vec![
            Size::new(80, 60),
            Size::new(160, 120),
            Size::new(320, 240),
            Size::new(640, 480),
        ]
    );
}

#[test]
fn test_model_size_is_multiple_of_four() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut transfer = StyleTransfer::new(Box::new(Recorder(seen.clone())));
    let style = OwnedStyle::solid([0.5; 3], 4, 4);

    for (w, h) in [(101, 99), (7, 7), (1, 1), (333, 517)] {
        for quality in 0..=3 {
            transfer.set_quality_factor(quality);
            transfer.run(&frame(w, h), &style.descriptor()).unwrap();
        }
    }
    for size in seen.borrow().iter() {
        assert_eq!(size.w % 4, 0, "{:?}", size);
        assert_eq!(size.h % 4, 0, "{:?}", size);
        assert!(size.w >= 4 && size.h >= 4);
    }
}

#[test]
fn test_identity_model_preserves_colour() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut transfer = StyleTransfer::new(Box::new(Recorder(seen)));
    let style = OwnedStyle::solid([0.5; 3], 4, 4);
    let out = transfer.run(&frame(64, 64), &style.descriptor()).unwrap().unwrap();
    for px in out.frame.data().chunks_exact(4) {
        assert!(px[0].abs_diff(128) <= 1);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn test_custom_range_clamps() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut transfer =
        StyleTransfer::new(Box::new(Recorder(seen))).with_range(QualityRange::new(-2, 1));
    transfer.set_quality_factor(5);
    assert_eq!(transfer.quality_factor(), 1);
    transfer.set_quality_factor(-9);
    assert_eq!(transfer.quality_factor(), -2);
}
