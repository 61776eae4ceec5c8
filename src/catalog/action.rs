use serde::{Deserialize, Serialize};

/// OMCI message types an entity can support. Discriminants are the message
/// type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Create = 4,
    Delete = 6,
    Set = 8,
    Get = 9,
    GetAllAlarms = 11,
    GetAllAlarmsNext = 12,
    MibUpload = 13,
    MibUploadNext = 14,
    MibReset = 15,
    AlarmNotification = 16,
    AttributeValueChange = 17,
    Test = 18,
    StartSoftwareDownload = 19,
    DownloadSection = 20,
    EndSoftwareDownload = 21,
    ActivateSoftware = 22,
    CommitSoftware = 23,
    SynchronizeTime = 24,
    Reboot = 25,
    GetNext = 26,
    TestResult = 27,
    GetCurrentData = 28,
    SetTable = 29,
}
