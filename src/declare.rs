use strum::{AsRefStr, Display};

/// 貴金屬品項
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash, Display, AsRefStr)]
pub enum Commodity {
    /// 24K 黃金，每公克報價
    #[strum(serialize = "gold")]
    Gold,
    /// 白銀，每公斤報價
    #[strum(serialize = "silver")]
    Silver,
}

impl Commodity {
    /// 報價 API 的 product 參數
    pub fn product_code(&self) -> &'static str {
        match self {
            Commodity::Gold => "24KGOLD",
            Commodity::Silver => "24KSILVER",
        }
    }

    /// 顯示於看板上的名稱
    pub fn label(&self) -> &'static str {
        match self {
            Commodity::Gold => "GOLD 24K (1g)",
            Commodity::Silver => "SILVER (1kg)",
        }
    }
}
