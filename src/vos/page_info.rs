use serde::Serialize;

/// 分页信息，字段命名与前端分页条保持一致
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo<T> {
    pub page_num: i64,
    pub page_size: i64,
    /// 当前页实际的记录数
    pub size: i64,
    /// 当前页第一条记录在全部结果中的行号，从 1 开始；空页为 0
    pub start_row: i64,
    pub end_row: i64,
    pub total: i64,
    pub pages: i64,
    pub list: Vec<T>,
    pub pre_page: i64,
    pub next_page: i64,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub navigate_pages: i64,
    pub navigatepage_nums: Vec<i64>,
    pub navigate_first_page: i64,
    pub navigate_last_page: i64,
}

/// 总页数
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 || total <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

impl<T> PageInfo<T> {
    pub fn new(list: Vec<T>, total: i64, page_num: i64, page_size: i64, navigate_pages: i64) -> Self {
        let pages = page_count(total, page_size);
        let size = list.len() as i64;
        let (start_row, end_row) = if size == 0 {
            (0, 0)
        } else {
            let start = page_num
                .saturating_sub(1)
                .max(0)
                .saturating_mul(page_size)
                .saturating_add(1);
            (start, start.saturating_add(size - 1))
        };
        let navigatepage_nums = navigate_nums(page_num, pages, navigate_pages);

        PageInfo {
            page_num,
            page_size,
            size,
            start_row,
            end_row,
            total,
            pages,
            list,
            pre_page: if page_num > 1 { page_num - 1 } else { 0 },
            next_page: if page_num < pages { page_num + 1 } else { 0 },
            is_first_page: page_num == 1,
            is_last_page: page_num == pages || pages == 0,
            has_previous_page: page_num > 1,
            has_next_page: page_num < pages,
            navigate_pages,
            navigate_first_page: navigatepage_nums.first().copied().unwrap_or(0),
            navigate_last_page: navigatepage_nums.last().copied().unwrap_or(0),
            navigatepage_nums,
        }
    }
}

/// 以当前页为中心的连续页码，靠近两端时贴边
fn navigate_nums(page_num: i64, pages: i64, navigate_pages: i64) -> Vec<i64> {
    if navigate_pages <= 0 || pages <= 0 {
        return Vec::new();
    }
    if pages <= navigate_pages {
        return (1..=pages).collect();
    }

    let start = page_num.saturating_sub(navigate_pages / 2);
    let end = page_num.saturating_add(navigate_pages / 2);
    if start < 1 {
        (1..=navigate_pages).collect()
    } else if end > pages {
        (pages - navigate_pages + 1..=pages).collect()
    } else {
        (start..start + navigate_pages).collect()
    }
}
