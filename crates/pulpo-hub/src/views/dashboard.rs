use pulpo_shared::schemas::{AlertLevel, Item, StockStatus};

/// Drill-down lists behind the dashboard's KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    FastDepleting,
    SlowMoving,
    Overstock,
    Understock,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::FastDepleting,
        Panel::SlowMoving,
        Panel::Overstock,
        Panel::Understock,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fast_depleting" => Some(Self::FastDepleting),
            "slow_moving" => Some(Self::SlowMoving),
            "overstock" => Some(Self::Overstock),
            "understock" => Some(Self::Understock),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FastDepleting => "fast_depleting",
            Self::SlowMoving => "slow_moving",
            Self::Overstock => "overstock",
            Self::Understock => "understock",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::FastDepleting => "Items por agotarse",
            Self::SlowMoving => "Items de lento movimiento",
            Self::Overstock => "Items con sobrestock",
            Self::Understock => "Items bajo el ideal",
        }
    }
}

#[derive(Debug, Default)]
pub struct DashboardSummary<'a> {
    /// Running out soon, fewest days first.
    pub fast_depleting: Vec<&'a Item>,
    /// More than 90 days of stock, most days first.
    pub slow_moving: Vec<&'a Item>,
    pub overstock: Vec<&'a Item>,
    pub understock: Vec<&'a Item>,
    pub critical: Vec<&'a Item>,
}

impl<'a> DashboardSummary<'a> {
    pub fn from_items(items: &'a [Item]) -> Self {
        let mut fast_depleting: Vec<&Item> = items
            .iter()
            .filter(|i| {
                i.days_remaining > 0.0
                    && matches!(i.alert_level, AlertLevel::Urgent | AlertLevel::Soon)
            })
            .collect();
        fast_depleting.sort_by(|a, b| a.days_remaining.total_cmp(&b.days_remaining));

        let mut slow_moving: Vec<&Item> = items
            .iter()
            .filter(|i| i.days_remaining > 90.0 && i.alert_level != AlertLevel::NoData)
            .collect();
        slow_moving.sort_by(|a, b| b.days_remaining.total_cmp(&a.days_remaining));

        Self {
            fast_depleting,
            slow_moving,
            overstock: items
                .iter()
                .filter(|i| i.stock_status == StockStatus::Excess)
                .collect(),
            understock: items
                .iter()
                .filter(|i| i.stock_status == StockStatus::Deficit)
                .collect(),
            critical: items
                .iter()
                .filter(|i| i.alert_level.is_critical())
                .collect(),
        }
    }

    pub fn panel(&self, panel: Panel) -> &[&'a Item] {
        match panel {
            Panel::FastDepleting => &self.fast_depleting,
            Panel::SlowMoving => &self.slow_moving,
            Panel::Overstock => &self.overstock,
            Panel::Understock => &self.understock,
        }
    }
}
