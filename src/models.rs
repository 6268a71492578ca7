//! Typed convenience models for the most used operations.
//!
//! The vendor schema is not under this crate's control, so every field is
//! optional. Use these with [`call_as`](crate::client::SascarClient::call_as)
//! or fall back to the generic records when the schema drifts.

use serde::{Deserialize, Serialize};

/// A vehicle as returned by `obterVeiculos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    /// Vehicle ID.
    #[serde(rename = "idVeiculo")]
    pub id: Option<i64>,
    /// License plate.
    #[serde(rename = "placa")]
    pub plate: Option<String>,
    /// ID of the customer owning the vehicle.
    #[serde(rename = "idCliente")]
    pub customer_id: Option<i64>,
    /// Free-form description.
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

/// A customer as returned by `obterClientes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    /// Customer ID.
    #[serde(rename = "idCliente")]
    pub id: Option<i64>,
    /// Legal name.
    #[serde(rename = "razaoSocial")]
    pub name: Option<String>,
    /// Trade name.
    #[serde(rename = "nomeFantasia")]
    pub trade_name: Option<String>,
}

/// A position packet as returned by the `obterPacotePosicoes` family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionPacket {
    /// Packet ID.
    #[serde(rename = "idPacote")]
    pub id: Option<i64>,
    /// Vehicle ID.
    #[serde(rename = "idVeiculo")]
    pub vehicle_id: Option<i64>,
    /// When the position was recorded, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "dataPosicao")]
    pub positioned_at: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(rename = "latitude")]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(rename = "longitude")]
    pub longitude: Option<f64>,
    /// Speed in km/h.
    #[serde(rename = "velocidade")]
    pub speed: Option<f64>,
    /// Ignition state.
    #[serde(rename = "ignicao")]
    pub ignition: Option<i64>,
    /// Odometer reading.
    #[serde(rename = "odometro")]
    pub odometer: Option<f64>,
}

/// The status of a sent command as returned by `obterStatusComando`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandStatus {
    /// The ticket number of the command.
    #[serde(rename = "ticket")]
    pub ticket: Option<i64>,
    /// Vehicle ID the command was sent to.
    #[serde(rename = "idVeiculo")]
    pub vehicle_id: Option<i64>,
    /// Status code.
    #[serde(rename = "status")]
    pub status: Option<i64>,
    /// Status description.
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{PositionPacket, Vehicle};
    use serde_json::json;

    #[test]
    fn vehicle_deserializes_from_a_converted_record() {
        let record = json!({
            "idVeiculo": 1231226,
            "placa": "ABC1D23",
            "idCliente": 5001,
            "campoDesconhecido": "ignored"
        });
        let vehicle: Vehicle = serde_json::from_value(record).unwrap();
        assert_eq!(vehicle.id, Some(1231226));
        assert_eq!(vehicle.plate.as_deref(), Some("ABC1D23"));
        assert_eq!(vehicle.description, None);
    }

    #[test]
    fn position_packet_tolerates_missing_fields() {
        let record = json!({ "idPacote": 900001, "latitude": -23.5505 });
        let packet: PositionPacket = serde_json::from_value(record).unwrap();
        assert_eq!(packet.id, Some(900001));
        assert_eq!(packet.latitude, Some(-23.5505));
        assert_eq!(packet.vehicle_id, None);
    }
}
