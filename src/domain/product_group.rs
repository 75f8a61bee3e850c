// ==========================================
// 销售分析与采购建议系统 - 品类白名单
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductGroup - 分析品类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductGroup {
    pub group_id: i64,        // 子组编码
    pub display_name: String, // 显示名
}

impl ProductGroup {
    pub fn new(group_id: i64, display_name: impl Into<String>) -> Self {
        Self {
            group_id,
            display_name: display_name.into(),
        }
    }
}

/// 默认白名单: 油、奶、糖
pub fn default_product_groups() -> Vec<ProductGroup> {
    vec![
        ProductGroup::new(211604, "ÓLEO"),
        ProductGroup::new(410204, "LEITE"),
        ProductGroup::new(210604, "AÇÚCAR"),
    ]
}

/// 按 group_id 查找显示名
pub fn display_name_of(groups: &[ProductGroup], group_id: i64) -> Option<&str> {
    groups
        .iter()
        .find(|g| g.group_id == group_id)
        .map(|g| g.display_name.as_str())
}
