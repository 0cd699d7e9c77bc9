use alloc::vec::Vec;

use crate::xml::XmlElement;

/// Elements read into a class that its contract does not know.
///
/// A class opts in with a `#[data_member(extension_data)]` field of this
/// type. The reader stores unknown member elements here and the writer
/// emits them again after the known members, so data written by a newer
/// version of a contract survives a round trip through an older one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionDataObject {
    elements: Vec<XmlElement>,
}

impl ExtensionDataObject {
    #[inline]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, element: XmlElement) {
        self.elements.push(element);
    }

    #[inline]
    pub fn elements(&self) -> &[XmlElement] {
        &self.elements
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
}
