// ==========================================
// 设备交付项目门禁系统 - 领域类型定义
// ==========================================
// 职责: 阶段、状态、类型等枚举
// 存储格式: SCREAMING_SNAKE_CASE 字符串 (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 声明一个与数据库编码一一对应的枚举
///
/// 生成 `as_str` / `from_code` / `Display` / serde 映射，
/// 未知编码由调用方决定如何处理（仓储层视为字段错误）。
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// 全部取值（按声明顺序）
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// 数据库编码
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// 从数据库编码解析
            pub fn from_code(code: &str) -> Option<Self> {
                match code.trim() {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ==========================================
// 项目阶段 (Stage)
// ==========================================
// 顺序: S1 < S2 < ... < S9
code_enum! {
    #[derive(PartialOrd, Ord)]
    Stage {
        S1 => "S1",
        S2 => "S2",
        S3 => "S3",
        S4 => "S4",
        S5 => "S5",
        S6 => "S6",
        S7 => "S7",
        S8 => "S8",
        S9 => "S9",
    }
}

impl Stage {
    /// 阶段中文名称
    pub fn name(&self) -> &'static str {
        match self {
            Stage::S1 => "需求接收",
            Stage::S2 => "方案评估",
            Stage::S3 => "立项签约",
            Stage::S4 => "设计",
            Stage::S5 => "采购",
            Stage::S6 => "生产装配",
            Stage::S7 => "调试与出厂验收",
            Stage::S8 => "发运与现场验收",
            Stage::S9 => "结项",
        }
    }

    /// 下一阶段（S9 无下一阶段）
    pub fn next(&self) -> Option<Stage> {
        let idx = Stage::ALL.iter().position(|s| s == self)?;
        Stage::ALL.get(idx + 1).copied()
    }
}

// ==========================================
// 门禁编码 (Gate Code)
// ==========================================
// G(n) 位于 S(n) 与 S(n+1) 之间
code_enum! {
    #[derive(PartialOrd, Ord)]
    GateCode {
        G1 => "G1",
        G2 => "G2",
        G3 => "G3",
        G4 => "G4",
        G5 => "G5",
        G6 => "G6",
        G7 => "G7",
        G8 => "G8",
    }
}

// ==========================================
// 项目状态 (Project Status)
// ==========================================
// 细粒度状态，由状态子系统维护
code_enum! {
    ProjectStatus {
        Draft => "DRAFT",
        RequirementCollecting => "REQUIREMENT_COLLECTING",
        RequirementConfirmed => "REQUIREMENT_CONFIRMED",
        Evaluating => "EVALUATING",
        Evaluated => "EVALUATED",
        SolutionDesigning => "SOLUTION_DESIGNING",
        SolutionReviewing => "SOLUTION_REVIEWING",
        Quoting => "QUOTING",
        Quoted => "QUOTED",
        Negotiating => "NEGOTIATING",
        ApprovalPending => "APPROVAL_PENDING",
        Approved => "APPROVED",
        ContractSigned => "CONTRACT_SIGNED",
        KickedOff => "KICKED_OFF",
        Designing => "DESIGNING",
        DesignReviewing => "DESIGN_REVIEWING",
        DesignApproved => "DESIGN_APPROVED",
        BomReleased => "BOM_RELEASED",
        Purchasing => "PURCHASING",
        MaterialReady => "MATERIAL_READY",
        Outsourcing => "OUTSOURCING",
        Assembling => "ASSEMBLING",
        Assembled => "ASSEMBLED",
        Debugging => "DEBUGGING",
        FatPending => "FAT_PENDING",
        FatPassed => "FAT_PASSED",
        Shipping => "SHIPPING",
        Installing => "INSTALLING",
        SatPending => "SAT_PENDING",
        SatPassed => "SAT_PASSED",
        FinalAccepted => "FINAL_ACCEPTED",
        Closed => "CLOSED",
        OnHold => "ON_HOLD",
        Cancelled => "CANCELLED",
    }
}

impl ProjectStatus {
    /// 是否处于立项审批通过之后的状态
    ///
    /// G3 在缺少立项评审记录时以此兜底。
    /// 新增状态必须在此处显式归类。
    pub fn is_post_approval(&self) -> bool {
        use ProjectStatus::*;
        match self {
            Approved | ContractSigned | KickedOff | Designing | DesignReviewing
            | DesignApproved | BomReleased | Purchasing | MaterialReady | Outsourcing
            | Assembling | Assembled | Debugging | FatPending | FatPassed | Shipping
            | Installing | SatPending | SatPassed | FinalAccepted | Closed => true,
            Draft | RequirementCollecting | RequirementConfirmed | Evaluating | Evaluated
            | SolutionDesigning | SolutionReviewing | Quoting | Quoted | Negotiating
            | ApprovalPending | OnHold | Cancelled => false,
        }
    }
}

// ==========================================
// 设备状态 (Machine Status)
// ==========================================
code_enum! {
    MachineStatus {
        Planned => "PLANNED",
        Designing => "DESIGNING",
        Purchasing => "PURCHASING",
        Assembling => "ASSEMBLING",
        Assembled => "ASSEMBLED",
        Debugging => "DEBUGGING",
        Ready => "READY",
        Completed => "COMPLETED",
        Shipped => "SHIPPED",
        Delivered => "DELIVERED",
        OnHold => "ON_HOLD",
    }
}

code_enum! {
    ContractStatus {
        Draft => "DRAFT",
        Reviewing => "REVIEWING",
        Approved => "APPROVED",
        Signed => "SIGNED",
        Terminated => "TERMINATED",
    }
}

code_enum! {
    EvaluationStatus {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
        Confirmed => "CONFIRMED",
        Rejected => "REJECTED",
    }
}

// ==========================================
// 文档 (Document)
// ==========================================
code_enum! {
    DocType {
        Requirement => "REQUIREMENT",
        Specification => "SPECIFICATION",
        Design => "DESIGN",
        Scheme => "SCHEME",
        Drawing => "DRAWING",
        Electrical => "ELECTRICAL",
        Software => "SOFTWARE",
        Debug => "DEBUG",
        Test => "TEST",
        Commissioning => "COMMISSIONING",
        Manual => "MANUAL",
        Other => "OTHER",
    }
}

code_enum! {
    DocStatus {
        Draft => "DRAFT",
        Reviewing => "REVIEWING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

// ==========================================
// 技术评审 (Technical Review)
// ==========================================
code_enum! {
    ReviewType {
        Proposal => "PROPOSAL",
        Approval => "APPROVAL",
        ProjectApproval => "PROJECT_APPROVAL",
        Ddr => "DDR",
        Scheme => "SCHEME",
        Design => "DESIGN",
        Fmea => "FMEA",
        Other => "OTHER",
    }
}

code_enum! {
    ReviewStatus {
        Planned => "PLANNED",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

code_enum! {
    #[derive(PartialOrd, Ord)]
    IssueLevel {
        A => "A",
        B => "B",
        C => "C",
    }
}

code_enum! {
    ReviewIssueStatus {
        Open => "OPEN",
        Processing => "PROCESSING",
        Resolved => "RESOLVED",
        Verified => "VERIFIED",
        Closed => "CLOSED",
    }
}

// ==========================================
// BOM / 外协 (Procurement)
// ==========================================
code_enum! {
    BomStatus {
        Draft => "DRAFT",
        Reviewing => "REVIEWING",
        Released => "RELEASED",
        Obsolete => "OBSOLETE",
    }
}

code_enum! {
    OutsourcingStatus {
        Draft => "DRAFT",
        Ordered => "ORDERED",
        Producing => "PRODUCING",
        PartialDelivered => "PARTIAL_DELIVERED",
        Delivered => "DELIVERED",
        Completed => "COMPLETED",
        Closed => "CLOSED",
        Cancelled => "CANCELLED",
    }
}

impl OutsourcingStatus {
    /// 已完成/已关闭的外协单不再参与到货检查（已取消的仍需检查）
    pub fn is_finished(&self) -> bool {
        matches!(self, OutsourcingStatus::Completed | OutsourcingStatus::Closed)
    }
}

code_enum! {
    /// 齐套率加权口径
    KitRateBasis {
        Quantity => "QUANTITY",
        Value => "VALUE",
    }
}

// ==========================================
// 验收 (Acceptance)
// ==========================================
code_enum! {
    AcceptanceType {
        Fat => "FAT",
        Sat => "SAT",
        Final => "FINAL",
    }
}

code_enum! {
    AcceptanceStatus {
        Pending => "PENDING",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

code_enum! {
    AcceptanceResult {
        Passed => "PASSED",
        Failed => "FAILED",
    }
}

code_enum! {
    AcceptanceIssueStatus {
        Open => "OPEN",
        Processing => "PROCESSING",
        Resolved => "RESOLVED",
        Closed => "CLOSED",
    }
}

// ==========================================
// 回款 / 问题 (Payment / Issue)
// ==========================================
code_enum! {
    PaymentStatus {
        Pending => "PENDING",
        Partial => "PARTIAL",
        Paid => "PAID",
        Overdue => "OVERDUE",
    }
}

code_enum! {
    IssueStatus {
        Open => "OPEN",
        Processing => "PROCESSING",
        Resolved => "RESOLVED",
        Closed => "CLOSED",
    }
}
