//! Deployment manifest for a worker task.

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, EnvVarSource, ObjectFieldSelector, PodSpec, PodTemplateSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

use super::types::{TaskNumber, WorkerTemplate, TASK_NUMBER_ENV, WORKER_ID_ENV};

/// Build the Deployment that runs workers for `task` in `namespace`.
pub fn build_deployment(template: &WorkerTemplate, namespace: &str, task: &TaskNumber) -> Deployment {
    let labels = template.labels(task);

    let env = vec![
        EnvVar {
            name: TASK_NUMBER_ENV.to_string(),
            value: Some(task.to_string()),
            ..Default::default()
        },
        // Each replica reports its own pod name.
        EnvVar {
            name: WORKER_ID_ENV.to_string(),
            value_from: Some(EnvVarSource {
                field_ref: Some(ObjectFieldSelector {
                    field_path: "metadata.name".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        },
    ];

    Deployment {
        metadata: ObjectMeta {
            name: Some(template.deployment_name(task)),
            namespace: Some(namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(template.replicas),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: template.app.clone(),
                        image: Some(template.image.clone()),
                        env: Some(env),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
