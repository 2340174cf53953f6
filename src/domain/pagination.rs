//! Paging and sorting primitives shared by repositories and services.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(format!("invalid sort direction '{s}', expected ASC or DESC")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A whitelisted sort key that maps to a concrete column.
pub trait SortKey: Copy + Send + Sync + fmt::Debug + 'static {
    fn column(&self) -> &'static str;
}

/// Sortable project columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    #[default]
    Id,
    Slug,
    Status,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for ProjectSort {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Slug => "slug",
            Self::Status => "status",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for ProjectSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "slug" => Ok(Self::Slug),
            "status" => Ok(Self::Status),
            "startDate" | "start_date" => Ok(Self::StartDate),
            "endDate" | "end_date" => Ok(Self::EndDate),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            other => Err(format!("cannot sort projects by '{other}'")),
        }
    }
}

/// Sortable team member columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamMemberSort {
    #[default]
    Id,
    Name,
    Email,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for TeamMemberSort {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for TeamMemberSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            other => Err(format!("cannot sort team members by '{other}'")),
        }
    }
}

/// A request for one page of a sorted collection. `page` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<S> {
    pub page: u32,
    pub size: u32,
    pub sort: S,
    pub direction: Direction,
}

impl<S: SortKey> PageRequest<S> {
    pub fn new(page: u32, size: u32, sort: S, direction: Direction) -> Self {
        Self {
            page,
            size,
            sort,
            direction,
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// `ORDER BY` clause built only from whitelisted columns. `id` is the
    /// tie-breaker so pages are stable.
    pub fn order_by(&self) -> String {
        let column = self.sort.column();
        if column == "id" {
            format!("id {}", self.direction.as_sql())
        } else {
            format!("{} {}, id ASC", column, self.direction.as_sql())
        }
    }

    /// Stable string used in list cache keys.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.page,
            self.size,
            self.sort.column(),
            self.direction.as_sql()
        )
    }
}

impl<S: SortKey + Default> Default for PageRequest<S> {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, S::default(), Direction::Asc)
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 || self.total <= 0 {
            return 0;
        }
        let size = i64::from(self.size);
        ((self.total + size - 1) / size) as u32
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page.saturating_add(1) >= self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}
