use crate::date::{DateError, DateOnly, Interval};
use crate::interval_set::IntervalSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Data structures for the backend's JSON bodies (Spanish camelCase field names)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Alquiler,
    Venta,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: i64,
    pub marca: String,
    pub modelo: String,
    pub ubicacion: Option<String>,
    pub precio_por_dia: Option<f64>,
    pub precio_total: Option<f64>,
    pub tipo_operacion: Option<OperationType>,
    pub validada: Option<bool>,
}

impl VehicleSummary {
    // A listing without a daily price is free to rent
    pub fn daily_rate(&self) -> f64 {
        self.precio_por_dia.unwrap_or(0.0)
    }

    pub fn is_rental(&self) -> bool {
        self.tipo_operacion != Some(OperationType::Venta)
    }
}

// Shared shape of reservations and availability blocks
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReservationRecord {
    pub id: Option<i64>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub motivo: Option<String>,
    pub fecha_reserva: Option<String>,
    pub total: Option<f64>,
    pub precio_dia: Option<f64>,
    pub confirmado: Option<bool>,
}

impl ReservationRecord {
    // Sale reservations carry no dates and therefore no interval
    pub fn interval(&self) -> Result<Option<Interval>, DateError> {
        match (self.fecha_inicio.as_deref(), self.fecha_fin.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Interval::parse(start, end).map(Some)
            }
            _ => Ok(None),
        }
    }
}

pub fn interval_set_from_records(records: &[ReservationRecord]) -> Result<IntervalSet, DateError> {
    let mut intervals = Vec::with_capacity(records.len());
    for record in records {
        match record.interval()? {
            Some(interval) => intervals.push(interval),
            None => debug!(id = ?record.id, "skipping record without dates"),
        }
    }
    Ok(IntervalSet::new(intervals))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct VehicleRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub fecha_inicio: DateOnly,
    pub fecha_fin: DateOnly,
    pub vehiculo: VehicleRef,
}

impl CreateReservationRequest {
    pub fn new(vehicle_id: i64, interval: Interval) -> Self {
        Self {
            fecha_inicio: interval.start(),
            fecha_fin: interval.end(),
            vehiculo: VehicleRef { id: vehicle_id },
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::spanning(self.fecha_inicio, self.fecha_fin)
    }
}

// Error body the backend sends alongside 4xx responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::day;

    #[test]
    fn test_availability_records_to_interval_set() {
        let json = r#"[
            {"id": 7, "fechaInicio": "2024-07-01", "fechaFin": "2024-07-03", "motivo": "RESERVA_PENDIENTE"},
            {"id": 3, "fechaInicio": "2024-06-10", "fechaFin": "2024-06-12", "motivo": "RESERVA_CONFIRMADA"},
            {"id": 9, "fechaInicio": null, "fechaFin": null, "total": 15000.0}
        ]"#;
        let records: Vec<ReservationRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);

        let set = interval_set_from_records(&records).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap().start(), day("2024-06-10"));
    }

    #[test]
    fn test_malformed_record_dates_fail() {
        let records = vec![ReservationRecord {
            fecha_inicio: Some("2024-06-12".to_string()),
            fecha_fin: Some("2024-06-10".to_string()),
            ..Default::default()
        }];
        assert!(matches!(
            interval_set_from_records(&records),
            Err(DateError::ReversedInterval { .. })
        ));
    }

    #[test]
    fn test_create_request_body() {
        let interval = Interval::parse("2024-06-15", "2024-06-20").unwrap();
        let request = CreateReservationRequest::new(42, interval);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "fechaInicio": "2024-06-15",
                "fechaFin": "2024-06-20",
                "vehiculo": {"id": 42}
            })
        );
        assert_eq!(request.interval(), interval);
    }

    #[test]
    fn test_vehicle_summary_rate() {
        let json = r#"{"id": 5, "marca": "Seat", "modelo": "Ibiza", "precioPorDia": 45.5, "tipoOperacion": "ALQUILER", "imagenes": []}"#;
        let vehicle: VehicleSummary = serde_json::from_str(json).unwrap();
        assert_eq!(vehicle.daily_rate(), 45.5);
        assert!(vehicle.is_rental());

        let sale: VehicleSummary =
            serde_json::from_str(r#"{"id": 6, "tipoOperacion": "VENTA", "precioTotal": 9000}"#).unwrap();
        assert_eq!(sale.daily_rate(), 0.0);
        assert!(!sale.is_rental());
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "El vehículo no está disponible en estas fechas."}"#).unwrap();
        assert_eq!(
            body.into_message().as_deref(),
            Some("El vehículo no está disponible en estas fechas.")
        );
    }
}
