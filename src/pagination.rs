use std::fmt;

/// Rows per page. Only the listed sizes are valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn rows(&self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    pub fn larger(&self) -> Self {
        match self {
            PageSize::Ten => PageSize::TwentyFive,
            PageSize::TwentyFive => PageSize::Fifty,
            PageSize::Fifty | PageSize::Hundred => PageSize::Hundred,
        }
    }

    pub fn smaller(&self) -> Self {
        match self {
            PageSize::Ten | PageSize::TwentyFive => PageSize::Ten,
            PageSize::Fifty => PageSize::TwentyFive,
            PageSize::Hundred => PageSize::Fifty,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = usize;

    fn try_from(rows: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.rows() == rows)
            .ok_or(rows)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

/// Slice of `ordered` shown on `page`. A page past the end is simply empty.
pub fn paginate<T>(ordered: &[T], page: usize, size: PageSize) -> &[T] {
    let begin = page.saturating_mul(size.rows()).min(ordered.len());
    let end = begin.saturating_add(size.rows()).min(ordered.len());
    &ordered[begin..end]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    size: PageSize,
    total: usize,
}

impl Pagination {
    pub fn new(size: PageSize) -> Self {
        Self {
            page: 0,
            size,
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.size.rows())
    }

    fn last_page_idx(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    /// A new row count means a new result set, so paging starts over.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = 0;
    }

    /// Returns false (and keeps the current page) when `page` is out of range.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page > self.last_page_idx() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.last_page_idx();
    }

    /// Accepts only the known page sizes. Anything else is ignored and the
    /// current size kept.
    pub fn set_page_size(&mut self, rows: usize) -> Result<PageSize, usize> {
        let size = PageSize::try_from(rows)?;
        self.resize(size);
        Ok(size)
    }

    pub fn grow_page_size(&mut self) {
        self.resize(self.size.larger());
    }

    pub fn shrink_page_size(&mut self) {
        self.resize(self.size.smaller());
    }

    fn resize(&mut self, size: PageSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.page = 0;
    }

    pub fn slice<'a, T>(&self, ordered: &'a [T]) -> &'a [T] {
        paginate(ordered, self.page, self.size)
    }

    /// Blank rows needed to pad a page holding `shown` rows to full height.
    pub fn filler_rows(&self, shown: usize) -> usize {
        self.size.rows().saturating_sub(shown)
    }

    /// 1-based (first, last) row numbers on the current page, (0, 0) if empty.
    pub fn range(&self) -> (usize, usize) {
        let begin = self.page * self.size.rows();
        if begin >= self.total {
            return (0, 0);
        }
        (begin + 1, (begin + self.size.rows()).min(self.total))
    }
}
