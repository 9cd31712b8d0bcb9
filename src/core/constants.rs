//! Well-known paths, ports and defaults

/// Port the API server binds on the control-plane node
pub const API_SERVER_PORT: u16 = 6443;

/// kubeadm configuration written to the node before `kubeadm init` runs
pub const KUBEADM_CONFIG_PATH: &str = "/tmp/install/kubeadm.conf";

/// Admin kubeconfig produced by `kubeadm init`
pub const ADMIN_KUBECONFIG_PATH: &str = "/etc/kubernetes/admin.conf";

pub const DEFAULT_CLUSTER_NAME: &str = "kubernetes";

/// Default listening port of the installer server
pub const DEFAULT_PORT: &str = "10023";

pub const DEFAULT_REGISTRY: &str = "registry.cn-hangzhou.aliyuncs.com/aliyun_kube_system";
