use crate::collection::RegionCollection;
use crate::error::ZoneError;
use crate::extraction::PdfDocument;
use crate::region::{Point, Region, Scale};
use crate::template::Template;

/// A region as it should be drawn on screen, with its ordinal label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub ordinal: usize,
    pub display: Region,
}

/// Authoring state for one open document.
///
/// Holds what a front end needs to let a user draw regions: the current page,
/// the zoom factor, a drag in progress and the regions drawn on this page.
/// Drags arrive in display space and are stored in document space.
#[derive(Debug, Clone)]
pub struct Editor {
    page_count: usize,
    page: usize,
    scale: Scale,
    regions: RegionCollection,
    drag_start: Option<Point>,
}

impl Editor {
    pub fn new(page_count: usize) -> Self {
        Editor {
            page_count,
            page: 0,
            scale: Scale::default(),
            regions: RegionCollection::new(),
            drag_start: None,
        }
    }

    pub fn for_document(document: &dyn PdfDocument) -> Self {
        Self::new(document.page_count())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn regions(&self) -> &RegionCollection {
        &self.regions
    }

    /// Move to the next page, discarding unsaved regions. Returns false on
    /// the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 >= self.page_count {
            return false;
        }
        self.page += 1;
        self.reset_page();
        true
    }

    /// Move to the previous page, discarding unsaved regions. Returns false
    /// on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        self.reset_page();
        true
    }

    pub fn zoom_in(&mut self) {
        self.scale = self.scale.zoomed_in();
    }

    pub fn zoom_out(&mut self) {
        self.scale = self.scale.zoomed_out();
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub fn begin_selection(&mut self, at: Point) {
        self.drag_start = Some(at);
    }

    pub fn cancel_selection(&mut self) {
        self.drag_start = None;
    }

    /// The rectangle being dragged, in display space.
    pub fn pending_selection(&self, at: Point) -> Option<Region> {
        self.drag_start.map(|start| Region::from_points(start, at))
    }

    /// Finish a drag at `at` and store it. Returns the new region's index,
    /// or `None` when no drag was started or the rectangle has no area.
    pub fn finish_selection(&mut self, at: Point) -> Option<usize> {
        let display = Region::from_points(self.drag_start.take()?, at);
        if display.width == 0.0 || display.height == 0.0 {
            return None;
        }
        Some(self.regions.append(display.to_document_space(self.scale)))
    }

    pub fn remove_region(&mut self, index: usize) -> Result<Region, ZoneError> {
        self.regions.remove(index)
    }

    /// Regions of the current page at the current zoom.
    pub fn overlay(&self) -> Vec<Overlay> {
        self.regions
            .labeled()
            .map(|(ordinal, region)| Overlay {
                ordinal,
                display: region.to_display_space(self.scale),
            })
            .collect()
    }

    /// A template holding the current page and its regions.
    pub fn to_template(&self) -> Template {
        Template::new(vec![self.regions.to_template_page(self.page)])
    }

    fn reset_page(&mut self) {
        self.regions.clear();
        self.drag_start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_stored_in_document_space() {
        let mut editor = Editor::new(3);
        editor.set_scale(Scale::new(2.0).unwrap());
        editor.begin_selection(Point::new(100.0, 100.0));
        assert_eq!(
            editor.pending_selection(Point::new(20.0, 40.0)),
            Some(Region::new(20.0, 40.0, 80.0, 60.0))
        );
        assert_eq!(editor.finish_selection(Point::new(20.0, 40.0)), Some(0));

        assert_eq!(
            editor.regions().get(0),
            Some(&Region::new(10.0, 20.0, 40.0, 30.0))
        );
        assert_eq!(
            editor.overlay(),
            vec![Overlay {
                ordinal: 1,
                display: Region::new(20.0, 40.0, 80.0, 60.0)
            }]
        );
    }

    #[test]
    fn test_finish_without_begin_or_zero_area() {
        let mut editor = Editor::new(1);
        assert_eq!(editor.finish_selection(Point::new(1.0, 1.0)), None);
        editor.begin_selection(Point::new(5.0, 5.0));
        assert_eq!(editor.finish_selection(Point::new(5.0, 30.0)), None);
        assert!(editor.regions().is_empty());
    }

    #[test]
    fn test_page_navigation_clamps_and_clears() {
        let mut editor = Editor::new(2);
        assert!(!editor.prev_page());
        editor.begin_selection(Point::new(0.0, 0.0));
        editor.finish_selection(Point::new(10.0, 10.0));

        assert!(editor.next_page());
        assert_eq!(editor.page(), 1);
        assert!(editor.regions().is_empty());
        assert!(!editor.next_page());
        assert_eq!(editor.page(), 1);
    }

    #[test]
    fn test_zoom_keeps_document_regions() {
        let mut editor = Editor::new(1);
        editor.begin_selection(Point::new(10.0, 10.0));
        editor.finish_selection(Point::new(50.0, 50.0));
        editor.zoom_in();

        assert_eq!(editor.regions().get(0), Some(&Region::new(10.0, 10.0, 40.0, 40.0)));
        let shown = editor.overlay()[0].display;
        assert!((shown.width - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_after_long_zoom_out_saves_valid_template() {
        let mut editor = Editor::new(1);
        for _ in 0..8000 {
            editor.zoom_out();
        }
        editor.begin_selection(Point::new(1.0, 1.0));
        editor.finish_selection(Point::new(2.0, 3.0));

        let json = crate::template::encode(&editor.to_template()).unwrap();
        let reloaded = crate::template::decode(&json).unwrap();
        assert!(reloaded.pages()[0].coordinates[0].width.is_finite());
    }

    #[test]
    fn test_remove_then_save_template() {
        let mut editor = Editor::new(5);
        editor.next_page();
        editor.next_page();
        for x in [0.0, 100.0, 200.0] {
            editor.begin_selection(Point::new(x, 0.0));
            editor.finish_selection(Point::new(x + 50.0, 20.0));
        }
        editor.remove_region(0).unwrap();
        assert!(editor.remove_region(2).is_err());

        let ordinals: Vec<usize> = editor.overlay().iter().map(|o| o.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2]);

        let template = editor.to_template();
        assert_eq!(template.pages().len(), 1);
        assert_eq!(template.pages()[0].page, 2);
        assert_eq!(template.pages()[0].coordinates[0].x, 100.0);
    }
}
