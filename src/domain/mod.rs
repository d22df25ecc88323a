// ==========================================
// 控制工程文档系统 - 领域模型层
// ==========================================
// 职责: 定义项目、I/O 点、因果规则、网络设备等实体
// 红线: 不含数据访问逻辑,不含生成逻辑
// ==========================================

pub mod cause_effect;
pub mod io_point;
pub mod network;
pub mod project;
pub mod types;

// 重导出核心类型
pub use cause_effect::{CauseEffectRule, NewCauseEffectRule};
pub use io_point::{IoPoint, NewIoPoint};
pub use network::{NetworkDevice, NewNetworkDevice};
pub use project::{NewProject, Project, ProjectMetadata};
pub use types::{IoType, LogicType};
