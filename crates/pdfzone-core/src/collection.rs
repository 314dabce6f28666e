use crate::error::ZoneError;
use crate::region::Region;
use crate::template::TemplatePage;

/// Regions drawn on the page currently being edited.
///
/// Position is the only identity a region has. Removing an entry shifts every
/// later entry down by one, and ordinal labels are derived from position on
/// each read, so an index is only meaningful until the next mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionCollection {
    regions: Vec<Region>,
}

impl RegionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region at the end, returning its index.
    pub fn append(&mut self, region: Region) -> usize {
        self.regions.push(region);
        self.regions.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Region, ZoneError> {
        if index >= self.regions.len() {
            return Err(ZoneError::Index {
                index,
                len: self.regions.len(),
            });
        }
        Ok(self.regions.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn snapshot(&self) -> Vec<Region> {
        self.regions.clone()
    }

    /// Regions paired with their one-based ordinal label.
    pub fn labeled(&self) -> impl Iterator<Item = (usize, &Region)> + '_ {
        self.regions.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn to_template_page(&self, page: usize) -> TemplatePage {
        TemplatePage {
            page,
            coordinates: self.snapshot(),
        }
    }
}
