// ==========================================
// 控制工程文档系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: I/O 清单导入 → 控制说明 / 结构化文本 / 导出表格生成
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 生成层 - 文本生成物
pub mod generator;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IoType, LogicType};

// 领域实体
pub use domain::{
    CauseEffectRule, IoPoint, NetworkDevice, NewCauseEffectRule, NewIoPoint, NewNetworkDevice,
    NewProject, Project, ProjectMetadata,
};

// 生成器
pub use generator::{
    export_network_topology, export_project_tables, generate_control_theory, generate_ladder_logic,
};

// 导入
pub use importer::{ImportOutcome, IoPointImporter, NetworkDeviceImporter};

// API
pub use api::{ArtifactApi, ArtifactKind, ImportApi, IoPointApi, ProjectApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "控制工程文档系统";
