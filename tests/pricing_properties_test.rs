use pricing_calc::calculators::discount::{calculate_discount, DiscountScenario, Timespan};
use pricing_calc::calculators::margin::{margin_for_revenue, required_revenue_for_margin};
use pricing_calc::calculators::repricing::{analyze_price_trend, calculate_sales_impact, TrendAnalysis};
use pricing_calc::calculators::saas_metrics::{calculate_quick_ratio, QuickRatioInput};

#[test]
fn test_trend_of_ten_percent_steps() {
    let trend = analyze_price_trend(&["100", "110"], "121");
    assert!((trend.trend - 10.0).abs() < 1e-9);
    assert!(trend.volatility.abs() < 1e-9);
}

#[test]
fn test_trend_without_history_is_flat() {
    let history: Vec<String> = vec![];
    assert_eq!(analyze_price_trend(&history, "100"), TrendAnalysis::flat());
}

#[test]
fn test_sales_impact_cap_and_linear_band() {
    assert_eq!(calculate_sales_impact(35.0), 10.0);
    assert!((calculate_sales_impact(5.0) - 0.5).abs() < 1e-12);
}

#[test]
fn test_discount_scenario() {
    let result = calculate_discount(&DiscountScenario {
        base_price: 100.0,
        discount_percentage: 20.0,
        expected_sales: 50.0,
        cost_per_unit: 40.0,
        timespan: Timespan::Month,
    });
    assert_eq!(result.effective_price, 80.0);
    assert_eq!(result.revenue, 4000.0);
    assert_eq!(result.profit, 2000.0);
    assert_eq!(result.profit_margin, Some(50.0));
}

#[test]
fn test_quick_ratio() {
    let result = calculate_quick_ratio(&QuickRatioInput {
        new_mrr: 100.0,
        expansion_mrr: 50.0,
        churn_mrr: 30.0,
        contraction_mrr: 20.0,
    });
    assert_eq!(result.quick_ratio, Some(3.0));
    assert_eq!(result.net_mrr, 100.0);
}

#[test]
fn test_required_revenue_reproduces_target_margin() {
    let costs = 7_350.0;
    for target in [5.0, 22.5, 40.0, 67.0, 90.0] {
        let revenue = required_revenue_for_margin(costs, target).unwrap();
        let margin = margin_for_revenue(revenue, costs).unwrap();
        assert!((margin - target).abs() < 1e-9, "target {} gave {}", target, margin);
    }
}
