use shopkeep_core::{Catalog, ProductId};

/// Memoized search result. The match list is recomputed only when the search term
/// or the catalog revision differs from the cached key.
#[derive(Clone, Debug, Default)]
pub struct FilteredView {
    key: Option<(String, u64)>,
    matches: Vec<ProductId>,
    recomputations: u64,
}

impl FilteredView {
    pub fn get(&mut self, catalog: &Catalog, revision: u64, term: &str) -> &[ProductId] {
        let fresh = matches!(
            &self.key,
            Some((cached, cached_revision)) if cached == term && *cached_revision == revision
        );
        if !fresh {
            self.matches = catalog.filter(term).into_iter().map(|product| product.id).collect();
            self.key = Some((term.to_string(), revision));
            self.recomputations += 1;
        }
        &self.matches
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use shopkeep_core::{Catalog, ProductId};

    use super::FilteredView;

    #[test]
    fn same_term_and_revision_reuses_cached_matches() {
        let catalog = Catalog::builtin();
        let mut view = FilteredView::default();

        assert_eq!(view.get(&catalog, 0, "smart"), &[ProductId(2), ProductId(4)]);
        assert_eq!(view.get(&catalog, 0, "smart"), &[ProductId(2), ProductId(4)]);
        assert_eq!(view.recomputations(), 1);
    }

    #[test]
    fn term_or_revision_change_recomputes() {
        let catalog = Catalog::builtin();
        let mut view = FilteredView::default();

        view.get(&catalog, 0, "smart");
        assert_eq!(view.get(&catalog, 0, "tab"), &[ProductId(3)]);
        assert_eq!(view.recomputations(), 2);

        let smaller = Catalog::new(catalog.products()[..1].to_vec());
        assert_eq!(view.get(&smaller, 1, "tab"), &[] as &[ProductId]);
        assert_eq!(view.recomputations(), 3);
    }
}
