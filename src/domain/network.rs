// ==========================================
// 控制工程文档系统 - 网络拓扑设备
// ==========================================
// 对齐: network_topology 表
// 说明: 纯配置记录，无派生计算
// ==========================================

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEVICE_TYPE: &str = "Other";
pub const DEFAULT_SUBNET_MASK: &str = "255.255.255.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDevice {
    pub id: String,
    pub project_id: String,
    pub device_name: String,
    pub device_type: String,
    pub ip_address: String,
    pub subnet_mask: String,
    pub gateway: String,
    pub mac_address: String,
    pub port: String,
    pub protocol: String,
    pub description: String,
    pub position_x: f64,
    pub position_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNetworkDevice {
    pub device_name: String,
    pub device_type: String,
    pub ip_address: String,
    pub subnet_mask: String,
    pub gateway: String,
    pub mac_address: String,
    pub port: String,
    pub protocol: String,
    pub description: String,
}
