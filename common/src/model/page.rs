//! The ordered band collection of a single page.
//!
//! `Page` is the only place band order is mutated before persistence. Every public
//! operation either succeeds and leaves the ranks as a contiguous `0..n` sequence, or
//! fails and leaves the page exactly as it was.

use std::str::FromStr;

use crate::error::BandError;
use crate::model::band::{Band, BandKind, BandPayload, VisualConfig};
use crate::model::new_id;
use crate::model::ordering;
use crate::reorder::ReorderIntent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    id: String,
    bands: Vec<Band>,
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bands: Vec::new(),
        }
    }

    /// Builds a page from stored bands, sorting them by rank.
    ///
    /// Fails if a band belongs to another page, if identifiers repeat, or if the ranks
    /// are not contiguous from zero.
    pub fn from_bands(id: impl Into<String>, mut bands: Vec<Band>) -> Result<Self, BandError> {
        let id = id.into();
        for band in &bands {
            if band.page_id != id {
                return Err(BandError::validation(format!(
                    "band '{}' belongs to page '{}', not '{id}'",
                    band.id, band.page_id
                )));
            }
            band.validate()?;
        }
        ordering::validate_contiguous(&bands)?;
        bands.sort_by_key(|band| band.order);
        Ok(Self { id, bands })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn into_bands(self) -> Vec<Band> {
        self.bands
    }

    pub fn band(&self, band_id: &str) -> Option<&Band> {
        self.bands.iter().find(|band| band.id == band_id)
    }

    pub fn band_mut(&mut self, band_id: &str) -> Result<&mut Band, BandError> {
        self.bands
            .iter_mut()
            .find(|band| band.id == band_id)
            .ok_or_else(|| BandError::not_found(format!("band '{band_id}'")))
    }

    /// Band identifiers in display order.
    pub fn ordering(&self) -> Vec<String> {
        ordering::ids_of(&self.bands)
    }

    /// Creates a band at the end of the page (`order = max + 1`).
    ///
    /// `kind` must name one of the enumerated band kinds and agree with the payload.
    pub fn add_band(
        &mut self,
        kind: &str,
        payload: BandPayload,
        visual: VisualConfig,
    ) -> Result<&Band, BandError> {
        let kind = BandKind::from_str(kind)?;
        if payload.kind() != kind {
            return Err(BandError::validation(format!(
                "a {kind} band cannot carry a {} payload",
                payload.kind()
            )));
        }

        let band = Band {
            id: new_id(),
            page_id: self.id.clone(),
            order: self.bands.len(),
            visual,
            payload,
        };
        band.validate()?;
        self.bands.push(band);
        Ok(&self.bands[self.bands.len() - 1])
    }

    /// Appends a band that already carries an identity, e.g. one echoed by the store.
    pub fn push_band(&mut self, band: Band) -> Result<(), BandError> {
        if band.page_id != self.id {
            return Err(BandError::validation("band belongs to another page"));
        }
        if self.band(&band.id).is_some() {
            return Err(BandError::validation(format!("duplicate band '{}'", band.id)));
        }
        if band.order != self.bands.len() {
            return Err(BandError::invalid_ordering(format!(
                "band order {} must be {}",
                band.order,
                self.bands.len()
            )));
        }
        band.validate()?;
        self.bands.push(band);
        Ok(())
    }

    /// Replaces the payload and visual settings of an existing band. Order is kept.
    pub fn replace_band(&mut self, band: Band) -> Result<(), BandError> {
        band.validate()?;
        let current = self.band_mut(&band.id)?;
        current.visual = band.visual;
        current.payload = band.payload;
        Ok(())
    }

    /// Deletes a band and compacts the ranks of the bands that followed it.
    pub fn remove_band(&mut self, band_id: &str) -> Result<Band, BandError> {
        let index = self
            .bands
            .iter()
            .position(|band| band.id == band_id)
            .ok_or_else(|| BandError::not_found(format!("band '{band_id}'")))?;
        let removed = self.bands.remove(index);
        ordering::compact(&mut self.bands);
        Ok(removed)
    }

    /// Reorders the bands; `new_ordering` must be a permutation of the current ids.
    pub fn reorder_bands(&mut self, new_ordering: &[String]) -> Result<(), BandError> {
        ordering::apply_ordering(&mut self.bands, new_ordering)
    }

    /// Applies a `{band id: rank}` intent after validating it against this page.
    pub fn apply_intent(&mut self, intent: &ReorderIntent) -> Result<(), BandError> {
        let new_ordering = intent.to_ordering()?;
        self.reorder_bands(&new_ordering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::band::{GenericPayload, ProductPayload, SlideshowPayload};

    fn generic(html: &str) -> BandPayload {
        BandPayload::Generic(GenericPayload { html: html.into() })
    }

    fn orders(page: &Page) -> Vec<usize> {
        page.bands().iter().map(|band| band.order).collect()
    }

    fn page_with(n: usize) -> (Page, Vec<String>) {
        let mut page = Page::new("home");
        let ids = (0..n)
            .map(|i| {
                page.add_band("generic", generic(&format!("<p>{i}</p>")), VisualConfig::default())
                    .unwrap()
                    .id
                    .clone()
            })
            .collect();
        (page, ids)
    }

    #[test]
    fn add_assigns_next_order() {
        let (page, ids) = page_with(3);
        assert_eq!(orders(&page), vec![0, 1, 2]);
        assert_eq!(page.ordering(), ids);
    }

    #[test]
    fn add_rejects_unknown_kind_and_mismatched_payload() {
        let mut page = Page::new("home");
        assert!(matches!(
            page.add_band("video", generic(""), VisualConfig::default()),
            Err(BandError::Validation(_))
        ));
        assert!(matches!(
            page.add_band(
                "product",
                BandPayload::Slideshow(SlideshowPayload::default()),
                VisualConfig::default()
            ),
            Err(BandError::Validation(_))
        ));
        assert!(page.bands().is_empty());
    }

    #[test]
    fn add_accepts_every_kind_with_its_payload() {
        let mut page = Page::new("home");
        for kind in BandKind::ALL {
            page.add_band(kind.as_str(), kind.empty_payload(), VisualConfig::default())
                .unwrap();
        }
        let kinds: Vec<BandKind> = page.bands().iter().map(Band::kind).collect();
        assert_eq!(kinds, BandKind::ALL.to_vec());

        let product = BandPayload::Product(ProductPayload {
            link: "javascript:alert(1)".into(),
            ..ProductPayload::default()
        });
        assert!(page
            .add_band("product", product, VisualConfig::default())
            .is_err());
    }

    #[test]
    fn remove_compacts_following_bands() {
        let (mut page, ids) = page_with(4);
        page.remove_band(&ids[1]).unwrap();
        assert_eq!(orders(&page), vec![0, 1, 2]);
        assert_eq!(page.ordering(), vec![ids[0].clone(), ids[2].clone(), ids[3].clone()]);
    }

    #[test]
    fn remove_unknown_band_is_not_found() {
        let (mut page, _) = page_with(2);
        assert!(matches!(page.remove_band("nope"), Err(BandError::NotFound(_))));
        assert_eq!(orders(&page), vec![0, 1]);
    }

    #[test]
    fn reorder_with_non_permutation_leaves_order_unchanged() {
        let (mut page, ids) = page_with(3);
        let before = page.clone();
        let bad = vec![ids[2].clone(), ids[2].clone(), ids[0].clone()];

        assert!(matches!(
            page.reorder_bands(&bad),
            Err(BandError::InvalidOrdering(_))
        ));
        assert_eq!(page, before);
    }

    #[test]
    fn reorder_applies_permutation() {
        let (mut page, ids) = page_with(3);
        let wanted = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];
        page.reorder_bands(&wanted).unwrap();
        assert_eq!(page.ordering(), wanted);
        assert_eq!(orders(&page), vec![0, 1, 2]);
    }

    #[test]
    fn intent_is_validated_against_current_bands() {
        let (mut page, ids) = page_with(2);
        let intent = ReorderIntent::from_ordering(&[ids[1].clone(), ids[0].clone()]);
        page.apply_intent(&intent).unwrap();
        assert_eq!(page.ordering(), vec![ids[1].clone(), ids[0].clone()]);

        let stale = ReorderIntent::from_ordering(&[ids[0].clone()]);
        assert!(page.apply_intent(&stale).is_err());
        assert_eq!(page.ordering(), vec![ids[1].clone(), ids[0].clone()]);
    }

    #[test]
    fn from_bands_sorts_and_rejects_gaps() {
        let (page, ids) = page_with(3);
        let mut bands = page.clone().into_bands();
        bands.reverse();
        let rebuilt = Page::from_bands("home", bands.clone()).unwrap();
        assert_eq!(rebuilt.ordering(), ids);

        bands[0].order = 7;
        assert!(Page::from_bands("home", bands).is_err());
    }

    #[test]
    fn push_band_requires_next_order() {
        let (mut page, _) = page_with(1);
        let mut other = page_with(2).0.into_bands().remove(1);
        assert!(page.push_band(other.clone()).is_ok());

        other.id = "fresh".into();
        other.order = 5;
        assert!(matches!(
            page.push_band(other),
            Err(BandError::InvalidOrdering(_))
        ));
    }
}
