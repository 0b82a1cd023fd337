/// One page of a paginated listing, normalized from whatever envelope the
/// backend answered with.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// Zero-based index of this page.
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            first: true,
            last: true,
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            first: self.first,
            last: self.last,
        }
    }
}

/// Which rows a listing should include with regard to soft deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveFilter {
    #[default]
    Active,
    Inactive,
    All,
}

impl ActiveFilter {
    /// Value of the `activo` query parameter, `None` when no filter applies.
    pub fn as_query(self) -> Option<bool> {
        match self {
            ActiveFilter::Active => Some(true),
            ActiveFilter::Inactive => Some(false),
            ActiveFilter::All => None,
        }
    }
}

/// Filters selected by the user for a CRUD table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub search: Option<String>,
    pub active: ActiveFilter,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }
}
