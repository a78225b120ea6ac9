use crate::num::Number;

use serde::Serialize;

/// Manual localization of the sign in one frame, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub frame: String,
    pub sign_id: i32,
    /// Top left corner.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    #[inline]
    pub fn center(&self) -> (Number, Number) {
        (
            self.x as Number + self.width as Number / 2.0,
            self.y as Number + self.height as Number / 2.0,
        )
    }

    /// Radius of the circle that encloses the sign.
    #[inline]
    pub fn radius(&self) -> Number {
        self.width.max(self.height) as Number / 2.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Annotations {
    boxes: Vec<BoundingBox>,
}

impl Annotations {
    #[inline]
    pub fn new(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }

    /// The first box annotated on `frame`.
    pub fn get(&self, frame: &str) -> Option<&BoundingBox> {
        self.boxes.iter().find(|b| b.frame == frame)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[test]
fn test_bounding_box_circle() {
    let bb = BoundingBox {
        frame: "001875.jpg".to_owned(),
        sign_id: 3,
        x: 100,
        y: 40,
        width: 30,
        height: 50,
    };
    assert_eq!(bb.center(), (115.0, 65.0));
    assert_eq!(bb.radius(), 25.0);

    let annotations = Annotations::new(vec![bb.clone()]);
    assert_eq!(annotations.get("001875.jpg"), Some(&bb));
    assert!(annotations.get("001876.jpg").is_none());
}
