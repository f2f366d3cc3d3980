//! Box layout: children stacked along one axis.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::element::{ElementBase, ElementRef, Widget};
use crate::input::Frame;
use crate::layout::{Align, Orientation, Padding};
use crate::primitives::{Point, Rect, Size};

/// A child of a box with its layout options.
#[derive(Debug, Clone)]
pub struct BoxItem {
    pub element: ElementRef,
    /// Receive a share of the main-axis room left after preferred sizes.
    pub expand: bool,
    /// Cross-axis placement.
    pub align: Align,
}

#[derive(Debug)]
pub struct BoxLayout {
    orientation: Orientation,
    align: Align,
    items: VecDeque<BoxItem>,
    padding: Padding,
    spacing: i32,
}

impl BoxLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            align: Align::Start,
            items: VecDeque::new(),
            padding: Padding::default(),
            spacing: 0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn align(&self) -> Align {
        self.align
    }

    /// Main-axis placement of the whole run of children.
    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: i32) {
        self.spacing = spacing;
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &BoxItem> {
        self.items.iter()
    }

    pub fn push_back(&mut self, element: &ElementRef, align: Align, expand: bool) {
        self.items.push_back(item(element, align, expand));
    }

    pub fn push_front(&mut self, element: &ElementRef, align: Align, expand: bool) {
        self.items.push_front(item(element, align, expand));
    }

    pub fn pop_back(&mut self) -> Option<ElementRef> {
        self.items.pop_back().map(|i| i.element)
    }

    /// Remove the first child.
    pub fn pop_start(&mut self) -> Option<ElementRef> {
        self.items.pop_front().map(|i| i.element)
    }

    /// Returns false if `before` is not a child.
    pub fn insert_before(
        &mut self,
        before: &ElementRef,
        element: &ElementRef,
        align: Align,
        expand: bool,
    ) -> bool {
        match self.position_of(before) {
            Some(index) => {
                self.items.insert(index, item(element, align, expand));
                true
            }
            None => false,
        }
    }

    /// Returns false if `after` is not a child.
    pub fn insert_after(
        &mut self,
        after: &ElementRef,
        element: &ElementRef,
        align: Align,
        expand: bool,
    ) -> bool {
        match self.position_of(after) {
            Some(index) => {
                self.items.insert(index + 1, item(element, align, expand));
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, element: &ElementRef) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !Arc::ptr_eq(&i.element, element));
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position_of(&self, element: &ElementRef) -> Option<usize> {
        self.items.iter().position(|i| Arc::ptr_eq(&i.element, element))
    }

    /// Sum of the children along the main axis plus spacing, by the largest
    /// child across it, plus padding.
    pub fn measure(&self) -> Size {
        let o = self.orientation;
        let mut main = 0;
        let mut cross = 0;
        for (index, item) in self.items.iter().enumerate() {
            let size = item.element.layout_size();
            if index > 0 {
                main += self.spacing;
            }
            main += o.main(size);
            cross = cross.max(o.cross(size));
        }

        let (main_start, main_end) = self.padding.main(o);
        let (cross_start, cross_end) = self.padding.cross(o);
        o.size(main + main_start + main_end, cross + cross_start + cross_end)
    }
}

fn item(element: &ElementRef, align: Align, expand: bool) -> BoxItem {
    BoxItem {
        element: element.clone(),
        expand,
        align,
    }
}

/// Extra main-axis pixels each expanding child receives. The remainder of
/// the division is left unassigned.
pub(crate) fn expand_share(extent: i32, preferred: i32, expanders: i32) -> i32 {
    if expanders > 0 {
        (extent - preferred).max(0) / expanders
    } else {
        0
    }
}

/// Main-axis coordinate of the first child.
pub(crate) fn main_start(align: Align, extent: i32, content: i32, pad_start: i32) -> i32 {
    match align {
        Align::Start | Align::Fill => pad_start,
        Align::Middle => (extent - content) / 2 + pad_start,
        Align::End => extent - content + pad_start,
    }
}

/// Cross-axis coordinate and extent of one child.
pub(crate) fn cross_place(
    align: Align,
    extent: i32,
    pad: (i32, i32),
    child: i32,
) -> (i32, i32) {
    let inner = extent - pad.0 - pad.1;
    match align {
        Align::Start => (pad.0, child),
        Align::Middle => (pad.0 + (inner - child) / 2, child),
        Align::End => (extent - pad.1 - child, child),
        Align::Fill => (pad.0, inner),
    }
}

impl Widget for BoxLayout {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let o = self.orientation;
        let size = base.size;
        let extent = o.main(size);
        let preferred = o.main(self.measure()).min(extent);

        let expanders = self.items.iter().filter(|i| i.expand).count() as i32;
        let extra = if expanders > 0 { extent - preferred } else { 0 };
        let share = expand_share(extent, preferred, expanders);

        let (pad_start, _) = self.padding.main(o);
        let cross_pad = self.padding.cross(o);
        let mut main = main_start(self.align, extent, preferred + extra, pad_start);

        let p = self.padding;
        frame.draw.push_clip(Rect::new(
            origin.x + p.left,
            origin.y + p.top,
            (size.width - p.horizontal()).max(0),
            (size.height - p.vertical()).max(0),
        ));

        for item in &self.items {
            let preferred = item.element.layout_size();
            let mut child_main = o.main(preferred);
            if item.expand {
                child_main += share;
            }
            let (cross, child_cross) =
                cross_place(item.align, o.cross(size), cross_pad, o.cross(preferred));

            item.element.set_size(o.size(child_main, child_cross));
            item.element.set_pos(o.point(main, cross));
            item.element.draw(frame, origin);

            main += child_main + self.spacing;
        }

        frame.draw.pop_clip();
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(self.measure())
    }
}
