use tera::{Context, Tera};

use crate::state::CatalogError;
use crate::view::CatalogView;

const CATALOG_TEMPLATE: &str = "catalog.html";

/// HTML renderer for [`CatalogView`] backed by the embedded page template.
pub struct CatalogRenderer {
    tera: Tera,
}

impl CatalogRenderer {
    pub fn new() -> Result<Self, CatalogError> {
        let mut tera = Tera::default();
        tera.add_raw_template(CATALOG_TEMPLATE, include_str!("../templates/catalog.html"))
            .map_err(render_error)?;
        Ok(Self { tera })
    }

    pub fn render(&self, view: &CatalogView) -> Result<String, CatalogError> {
        let context = Context::from_serialize(view).map_err(render_error)?;
        self.tera.render(CATALOG_TEMPLATE, &context).map_err(render_error)
    }
}

fn render_error(error: tera::Error) -> CatalogError {
    CatalogError::Render(error.to_string())
}
