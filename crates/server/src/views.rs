//! Engine values to wire DTOs.

use api_types::{
    catalog::{ConsumableView, ProductView},
    daily::{
        BaguettesView, DailySummaryView, EarningsView, SummaryTotalsView, UsageLineView, UsageView,
    },
    ledger::{ExpenseView, LeftoversView, PurchaseView, SaleBatchView, SaleView},
    reports::{ConsumableTotalView, DayView, WeeklySummaryView, WeeklyTotalsView},
    user::{Role as RoleView, UserView},
};

pub(crate) fn role(role: engine::Role) -> RoleView {
    match role {
        engine::Role::User => RoleView::User,
        engine::Role::Vip => RoleView::Vip,
        engine::Role::Admin => RoleView::Admin,
    }
}

pub(crate) fn engine_role(role: RoleView) -> engine::Role {
    match role {
        RoleView::User => engine::Role::User,
        RoleView::Vip => engine::Role::Vip,
        RoleView::Admin => engine::Role::Admin,
    }
}

pub(crate) fn user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        role: role(user.role),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub(crate) fn consumable(consumable: engine::Consumable) -> ConsumableView {
    ConsumableView {
        id: consumable.id,
        name: consumable.name,
        price_minor: consumable.price.minor(),
        current_stock: consumable.current_stock,
    }
}

pub(crate) fn product(product: engine::Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        category: product.category,
        price_minor: product.price.minor(),
    }
}

pub(crate) fn usage(usage: engine::Usage) -> UsageView {
    UsageView {
        id: usage.id,
        record_date: usage.key.record_date,
        consumable_id: usage.key.consumable_id,
        start_count: usage.counts.start,
        end_count: usage.counts.end,
        used_count: usage.counts.used,
    }
}

pub(crate) fn usage_line(line: engine::UsageLine) -> UsageLineView {
    UsageLineView {
        id: line.usage.id,
        record_date: line.usage.key.record_date,
        consumable_id: line.usage.key.consumable_id,
        consumable_name: line.consumable.name,
        price_minor: line.consumable.price.minor(),
        start_count: line.usage.counts.start,
        end_count: line.usage.counts.end,
        used_count: line.usage.counts.used,
        cost_minor: line.cost.minor(),
    }
}

pub(crate) fn baguettes(baguettes: engine::Baguettes) -> BaguettesView {
    BaguettesView {
        record_date: baguettes.record_date,
        start_count: baguettes.counts.start,
        end_count: baguettes.counts.end,
        used_count: baguettes.counts.used,
    }
}

pub(crate) fn earnings(earnings: engine::Earnings) -> EarningsView {
    EarningsView {
        record_date: earnings.record_date,
        total_earnings_minor: earnings.total_earnings.minor(),
        consumables_cost_minor: earnings.consumables_cost.minor(),
        net_profit_minor: earnings.net_profit.minor(),
        notes: earnings.notes,
    }
}

pub(crate) fn summary(summary: engine::DailySummary) -> DailySummaryView {
    DailySummaryView {
        date: summary.date,
        consumables: summary.consumables.into_iter().map(usage_line).collect(),
        baguettes: baguettes(summary.baguettes),
        earnings: earnings(summary.earnings),
        totals: SummaryTotalsView {
            total_consumables_cost_minor: summary.totals.total_consumables_cost.minor(),
            total_consumables_used: summary.totals.total_consumables_used,
            total_baguettes_used: summary.totals.total_baguettes_used,
        },
    }
}

pub(crate) fn weekly(report: engine::WeeklySummary) -> WeeklySummaryView {
    WeeklySummaryView {
        week_start: report.week_start,
        week_end: report.week_end,
        days: report
            .days
            .into_iter()
            .map(|day| DayView {
                date: day.date,
                summary: day.summary.map(summary),
            })
            .collect(),
        totals: WeeklyTotalsView {
            total_cost_minor: report.totals.total_cost.minor(),
            total_earnings_minor: report.totals.total_earnings.minor(),
            total_net_profit_minor: report.totals.total_net_profit.minor(),
            total_baguettes_used: report.totals.total_baguettes_used,
        },
        consumables: report
            .consumables
            .into_iter()
            .map(|total| ConsumableTotalView {
                name: total.name,
                used: total.used,
                cost_minor: total.cost.minor(),
            })
            .collect(),
    }
}

pub(crate) fn purchase(purchase: engine::Purchase) -> PurchaseView {
    PurchaseView {
        id: purchase.id,
        consumable_id: purchase.consumable_id,
        consumable_name: purchase.consumable_name,
        quantity: purchase.quantity,
        cost_minor: purchase.cost.minor(),
        purchase_date: purchase.purchase_date,
    }
}

pub(crate) fn sale(sale: engine::Sale) -> SaleView {
    SaleView {
        id: sale.id,
        product_id: sale.product_id,
        product_name: sale.product_name,
        quantity: sale.quantity,
        total_price_minor: sale.total_price.minor(),
        sale_timestamp: sale.sale_timestamp,
    }
}

pub(crate) fn sale_batch(batch: engine::SaleBatch) -> SaleBatchView {
    SaleBatchView {
        sales: batch.sales.into_iter().map(sale).collect(),
        total_minor: batch.total.minor(),
    }
}

pub(crate) fn expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        kind: expense.kind,
        amount_minor: expense.amount.minor(),
        description: expense.description,
        expense_date: expense.expense_date,
    }
}

pub(crate) fn leftovers(leftovers: engine::Leftovers) -> LeftoversView {
    LeftoversView {
        record_date: leftovers.record_date,
        bread_baguettes: leftovers.bread_baguettes,
        cooked_eggs: leftovers.cooked_eggs,
        salami_pieces: leftovers.salami_pieces,
        notes: leftovers.notes,
    }
}
