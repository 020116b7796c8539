//! 面板统计与筛选

use grievance_shared::{Grievance, GrievanceStatus};

/// 各状态计数，按状态精确匹配，列表外的状态不计入任何一项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally(list: &[Grievance]) -> Self {
        list.iter().fold(
            Self {
                total: list.len(),
                ..Self::default()
            },
            |mut counts, g| {
                match g.status {
                    GrievanceStatus::Open => counts.open += 1,
                    GrievanceStatus::InProgress => counts.in_progress += 1,
                    GrievanceStatus::Resolved => counts.resolved += 1,
                    GrievanceStatus::Closed => counts.closed += 1,
                    GrievanceStatus::Other(_) => {}
                }
                counts
            },
        )
    }

    pub fn get(&self, status: &GrievanceStatus) -> usize {
        match status {
            GrievanceStatus::Open => self.open,
            GrievanceStatus::InProgress => self.in_progress,
            GrievanceStatus::Resolved => self.resolved,
            GrievanceStatus::Closed => self.closed,
            GrievanceStatus::Other(_) => 0,
        }
    }
}

/// 状态筛选
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(GrievanceStatus),
}

impl StatusFilter {
    /// 筛选按钮顺序
    pub fn chips() -> Vec<StatusFilter> {
        std::iter::once(Self::All)
            .chain(GrievanceStatus::KNOWN.into_iter().map(Self::Only))
            .collect()
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }

    pub fn matches(&self, grievance: &Grievance) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => &grievance.status == status,
        }
    }

    pub fn apply<'a>(&self, list: &'a [Grievance]) -> Vec<&'a Grievance> {
        list.iter().filter(|g| self.matches(g)).collect()
    }
}

/// 状态徽章样式
pub fn status_badge_class(status: &GrievanceStatus) -> &'static str {
    match status {
        GrievanceStatus::Open => "bg-yellow-100 text-yellow-800",
        GrievanceStatus::InProgress => "bg-blue-100 text-blue-800",
        GrievanceStatus::Resolved => "bg-green-100 text-green-800",
        GrievanceStatus::Closed => "bg-slate-100 text-slate-800",
        GrievanceStatus::Other(_) => "bg-gray-100 text-gray-800",
    }
}

/// 分类文字颜色
pub fn category_text_class(category: Option<&grievance_shared::Category>) -> &'static str {
    use grievance_shared::Category;
    match category {
        Some(Category::Academic) => "text-purple-600",
        Some(Category::Hostel) => "text-orange-600",
        Some(Category::Infrastructure) => "text-red-600",
        Some(Category::Administration) => "text-blue-600",
        Some(Category::Fees) => "text-green-600",
        _ => "text-slate-600",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list() -> Vec<Grievance> {
        serde_json::from_value(json!([
            { "id": 1, "title": "a", "status": "Open" },
            { "id": 2, "title": "b", "status": "Open" },
            { "id": 3, "title": "c", "status": "In Progress" },
            { "id": 4, "title": "d", "status": "Resolved" },
            { "id": 5, "title": "e", "status": "Closed" },
            { "id": 6, "title": "f", "status": "submitted" },
            { "id": 7, "title": "g", "status": "open" }
        ]))
        .unwrap()
    }

    #[test]
    fn counts_match_exact_status() {
        let list = list();
        let counts = StatusCounts::tally(&list);
        assert_eq!(counts.open, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.resolved, 1);
        assert_eq!(counts.closed, 1);
        assert_eq!(counts.total, 7);

        for status in GrievanceStatus::KNOWN {
            let exact = list.iter().filter(|g| g.status == status).count();
            assert_eq!(counts.get(&status), exact);
        }
    }

    #[test]
    fn counts_never_exceed_total() {
        let list = list();
        for n in 0..=list.len() {
            let c = StatusCounts::tally(&list[..n]);
            assert!(c.open + c.in_progress + c.resolved <= c.total);
            assert!(c.open + c.in_progress + c.resolved + c.closed <= c.total);
        }
        assert_eq!(StatusCounts::tally(&[]), StatusCounts::default());
    }

    #[test]
    fn filter_rows() {
        let list = list();
        assert_eq!(StatusFilter::All.apply(&list).len(), 7);
        let open = StatusFilter::Only(GrievanceStatus::Open).apply(&list);
        assert_eq!(open.iter().map(|g| g.id).collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn chip_labels() {
        let labels: Vec<String> = StatusFilter::chips().iter().map(|c| c.label().to_string()).collect();
        assert_eq!(labels, ["All", "Open", "In Progress", "Resolved", "Closed"]);
    }
}
