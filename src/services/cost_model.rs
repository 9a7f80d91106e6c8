//! Modelo de costos y comisiones
//!
//! Funciones puras sobre montos monetarios. Todo el cálculo usa
//! `rust_decimal::Decimal`: nunca punto flotante binario, para que
//! agregar y quitar work items repetidamente no acumule drift.
//!
//! - Comisión de plataforma: función escalonada del costo del garaje.
//! - Total del cliente: costo del garaje + 5% de service fee + 700 de
//!   trip fee fijo (se aplica incondicionalmente, también con costo 0).

use rust_decimal::Decimal;

use crate::models::work_item::WorkItem;

/// Tarifa fija de traslado que paga el cliente en todo request
pub fn trip_fee() -> Decimal {
    Decimal::from(700)
}

/// Porcentaje de service fee sobre el costo del garaje (5%)
pub fn service_fee_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Tasa de comisión según el tramo de costo del garaje
pub fn commission_rate(garage_cost: Decimal) -> Decimal {
    if garage_cost < Decimal::from(10_000) {
        Decimal::new(10, 2) // 10%
    } else if garage_cost < Decimal::from(50_000) {
        Decimal::new(8, 2) // 8%
    } else if garage_cost < Decimal::from(100_000) {
        Decimal::new(6, 2) // 6%
    } else {
        Decimal::new(5, 2) // 5%
    }
}

/// Comisión que paga el garaje a la plataforma
pub fn garage_commission(garage_cost: Decimal) -> Decimal {
    garage_cost * commission_rate(garage_cost)
}

/// Lo que el garaje recibe después de la comisión
pub fn garage_earnings(garage_cost: Decimal) -> Decimal {
    garage_cost - garage_commission(garage_cost)
}

/// Total que paga el cliente: costo del garaje + service fee + trip fee
pub fn customer_total(garage_cost: Decimal) -> Decimal {
    let service_fee = garage_cost * service_fee_rate();
    garage_cost + service_fee + trip_fee()
}

/// Suma del ledger vigente. Recalcular desde el conjunto completo es
/// idempotente: siempre da el mismo resultado sin importar el historial
/// de altas y bajas.
pub fn sum_work_items(items: &[WorkItem]) -> Decimal {
    items.iter().map(|item| item.cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(cost: i64) -> WorkItem {
        WorkItem {
            id: Uuid::new_v4(),
            service_request_id: Uuid::new_v4(),
            description: "labor".to_string(),
            cost: Decimal::from(cost),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_commission_rate_tier_boundaries() {
        assert_eq!(commission_rate(Decimal::from(9_999)), Decimal::new(10, 2));
        assert_eq!(commission_rate(Decimal::from(10_000)), Decimal::new(8, 2));
        assert_eq!(commission_rate(Decimal::from(49_999)), Decimal::new(8, 2));
        assert_eq!(commission_rate(Decimal::from(50_000)), Decimal::new(6, 2));
        assert_eq!(commission_rate(Decimal::from(99_999)), Decimal::new(6, 2));
        assert_eq!(commission_rate(Decimal::from(100_000)), Decimal::new(5, 2));
    }

    #[test]
    fn test_garage_commission_and_earnings() {
        let cost = Decimal::from(20_000);
        let commission = garage_commission(cost);

        assert_eq!(commission, Decimal::from(1_600)); // 8%
        assert_eq!(garage_earnings(cost), Decimal::from(18_400));
        assert_eq!(garage_earnings(cost) + commission, cost);
    }

    #[test]
    fn test_customer_total_oil_change_scenario() {
        // oil filter 2000 + labor 1500 → 3500 + 175 + 700 = 4375
        let garage_cost = sum_work_items(&[item(2_000), item(1_500)]);

        assert_eq!(garage_cost, Decimal::from(3_500));
        assert_eq!(customer_total(garage_cost), Decimal::from(4_375));
    }

    #[test]
    fn test_customer_total_on_empty_ledger() {
        // Sin items el trip fee igual aplica
        let garage_cost = sum_work_items(&[]);

        assert_eq!(garage_cost, Decimal::ZERO);
        assert_eq!(customer_total(garage_cost), Decimal::from(700));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let items = vec![item(1_250), item(3_333), item(75)];

        let first = sum_work_items(&items);
        let second = sum_work_items(&items);

        assert_eq!(first, second);
        assert_eq!(customer_total(first), customer_total(second));
    }

    #[test]
    fn test_decimal_arithmetic_has_no_drift() {
        // 0.1 sumado diez veces da exactamente 1.0 con Decimal
        let tenth = Decimal::new(1, 1);
        let sum: Decimal = (0..10).map(|_| tenth).sum();
        assert_eq!(sum, Decimal::ONE);
    }
}
