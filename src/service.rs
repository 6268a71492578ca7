//! High-level wrappers for the SasIntegra operations.
//!
//! Each method forwards the fixed wire parameter names of one remote
//! operation and returns the converted records. The operation names and
//! parameter spelling are owned by the vendor.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::client::SascarClient;
use crate::error::SascarError;
use crate::params::Parameters;
use crate::SascarResult;

const UPDATE_PASSWORD: &str = "atualizarSenha";
const ACTUATOR_GROUPS: &str = "obterGrupoAtuadores";
const CUSTOMERS: &str = "obterClientes";
const VEHICLES: &str = "obterVeiculos";
const VEHICLES_JSON: &str = "obterVeiculosJson";
const POSITION_PACKETS: &str = "obterPacotePosicoes";
const POSITION_PACKETS_DRIVER: &str = "obterPacotePosicoesMotorista";
const POSITION_PACKETS_DRIVER_PLATE: &str = "obterPacotePosicoesMotoristaComPlaca";
const POSITION_PACKETS_RANGE: &str = "obterPacotePosicaoPorRange";
const POSITION_PACKETS_RANGE_DRIVER: &str = "obterPacotePosicaoMotoristaPorRange";
const POSITION_PACKETS_RANGE_JSON: &str = "obterPacotePosicaoPorRangeJSON";
const POSITION_PACKETS_RANGE_DRIVER_JSON: &str = "obterPacotePosicaoMotoristaPorRangeJSON";
const COMMAND_STATUS: &str = "obterStatusComando";
const COMMAND_STATUS_SASCAR_TICKET: &str = "obterStatusComandoTicketSascar";
const TELEMETRY_EVENTS: &str = "obterEventoTelemetriaIntegracao";
const TELEMETRY_EVENTS_ARRIVAL: &str = "obterEventoTelemetriaIntegracaoDataChegada";
const TELEMETRY_DELTA: &str = "obterDeltaTelemetriaIntegracao";

/// Which flavour of the position packet operations is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionScope {
    /// Plain vehicle positions
    Vehicle,
    /// Positions including driver information
    Driver,
    /// Positions including driver information and the vehicle plate
    DriverWithPlate,
}

/// Formats a datetime the way the service expects it (`YYYY-MM-DD HH:MM:SS`).
pub fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Unwraps the JSON document that the `...Json` operations carry inside a
/// single `return` text node.
fn json_records(values: Vec<Value>) -> SascarResult<Vec<Value>> {
    let Some(first) = values.into_iter().next() else {
        return Ok(Vec::new());
    };
    let Value::String(document) = first else {
        return Err(SascarError::NotJson);
    };
    if document.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(&document)? {
        Value::Array(records) => Ok(records),
        record => Ok(vec![record]),
    }
}

impl SascarClient {
    /// Updates the password of the integration account and returns the
    /// confirmation message of the service.
    pub async fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> SascarResult<String> {
        let parameters = Parameters::new()
            .param("usuario", self.username())
            .param("senhaAtual", current_password)
            .param("novaSenha", new_password);
        let values = self.call(UPDATE_PASSWORD, parameters).await?;

        Ok(values
            .into_iter()
            .next()
            .map(|value| match value {
                Value::String(message) => message,
                other => other.to_string(),
            })
            .unwrap_or_default())
    }

    /// Lists the sensors, actuators and events available for the account.
    pub async fn actuator_groups(&self) -> SascarResult<Vec<Value>> {
        self.call(ACTUATOR_GROUPS, self.auth_params()).await
    }

    /// Lists customers. A `customer_id` of 0 returns all customers.
    pub async fn customers(&self, quantity: u32, customer_id: u32) -> SascarResult<Vec<Value>> {
        let parameters = self
            .auth_params()
            .param("quantidade", quantity.to_string())
            .param("idCliente", customer_id.to_string());
        self.call(CUSTOMERS, parameters).await
    }

    /// Lists vehicles. A `quantity` of 0 returns all vehicles.
    pub async fn vehicles(&self, quantity: u32) -> SascarResult<Vec<Value>> {
        let parameters = self.auth_params().param("quantidade", quantity.to_string());
        self.call(VEHICLES, parameters).await
    }

    /// Lists vehicles through the JSON flavour of the operation.
    pub async fn vehicles_json(&self, quantity: u32) -> SascarResult<Vec<Value>> {
        let parameters = self.auth_params().param("quantidade", quantity.to_string());
        json_records(self.call(VEHICLES_JSON, parameters).await?)
    }

    /// Fetches the pending position packets, at most `quantity` of them.
    pub async fn position_packets(
        &self,
        quantity: u32,
        scope: PositionScope,
    ) -> SascarResult<Vec<Value>> {
        let operation = match scope {
            PositionScope::Vehicle => POSITION_PACKETS,
            PositionScope::Driver => POSITION_PACKETS_DRIVER,
            PositionScope::DriverWithPlate => POSITION_PACKETS_DRIVER_PLATE,
        };
        let parameters = self.auth_params().param("quantidade", quantity.to_string());
        self.call(operation, parameters).await
    }

    /// Fetches position packets by packet ID range.
    pub async fn position_packets_by_range(
        &self,
        id_start: u64,
        id_end: u64,
        quantity: u32,
        with_driver: bool,
    ) -> SascarResult<Vec<Value>> {
        let operation = if with_driver {
            POSITION_PACKETS_RANGE_DRIVER
        } else {
            POSITION_PACKETS_RANGE
        };
        self.call(operation, self.range_params(id_start, id_end, quantity))
            .await
    }

    /// Fetches position packets by packet ID range through the JSON flavour
    /// of the operation.
    pub async fn position_packets_by_range_json(
        &self,
        id_start: u64,
        id_end: u64,
        quantity: u32,
        with_driver: bool,
    ) -> SascarResult<Vec<Value>> {
        let operation = if with_driver {
            POSITION_PACKETS_RANGE_DRIVER_JSON
        } else {
            POSITION_PACKETS_RANGE_JSON
        };
        json_records(
            self.call(operation, self.range_params(id_start, id_end, quantity))
                .await?,
        )
    }

    fn range_params(&self, id_start: u64, id_end: u64, quantity: u32) -> Parameters {
        self.auth_params()
            .param("idInicio", id_start.to_string())
            .param("idFinal", id_end.to_string())
            .param("quantidade", quantity.to_string())
    }

    /// Fetches the status of a sent command by its ticket number.
    pub async fn command_status(&self, ticket: u64) -> SascarResult<Vec<Value>> {
        let parameters = self.auth_params().param("ticket", ticket.to_string());
        self.call(COMMAND_STATUS, parameters).await
    }

    /// Fetches the status of a sent command by Sascar's internal ticket
    /// number.
    pub async fn command_status_sascar_ticket(&self, ticket: u64) -> SascarResult<Vec<Value>> {
        let parameters = self.auth_params().param("ticket", ticket.to_string());
        self.call(COMMAND_STATUS_SASCAR_TICKET, parameters).await
    }

    /// Fetches the telemetry events of a vehicle within the given interval.
    pub async fn telemetry_events(
        &self,
        vehicle_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> SascarResult<Vec<Value>> {
        let parameters = self
            .auth_params()
            .param("idVeiculo", vehicle_id.to_string())
            .param("dataInicio", format_datetime(from))
            .param("dataFinal", format_datetime(to));
        self.call(TELEMETRY_EVENTS, parameters).await
    }

    /// Fetches the telemetry events of a vehicle filtered by arrival date.
    ///
    /// The arrival interval mirrors the event interval, as the service
    /// expects both. `event_ids` may be empty to fetch every event type.
    pub async fn telemetry_events_by_arrival(
        &self,
        vehicle_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
        event_ids: &[u32],
    ) -> SascarResult<Vec<Value>> {
        let mut parameters = self
            .auth_params()
            .param("idVeiculo", vehicle_id.to_string())
            .param("dataInicio", format_datetime(from))
            .param("dataFinal", format_datetime(to))
            .param("dataChegadaInicio", format_datetime(from))
            .param("dataChegadaFinal", format_datetime(to));
        for event_id in event_ids {
            parameters = parameters.param("idEventoList", event_id.to_string());
        }
        self.call(TELEMETRY_EVENTS_ARRIVAL, parameters).await
    }

    /// Fetches the delta telemetry of a vehicle within the given interval.
    pub async fn telemetry_delta(
        &self,
        vehicle_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> SascarResult<Vec<Value>> {
        let parameters = self
            .auth_params()
            .param("dataInicio", format_datetime(from))
            .param("dataFinal", format_datetime(to))
            .param("idVeiculo", vehicle_id.to_string());
        self.call(TELEMETRY_DELTA, parameters).await
    }
}
