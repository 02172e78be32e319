use super::graph::*;
use crate::stack::Stack;
use serde_json::{json, Map, Value};

/// Template parameter the deployer fills with the built function image
pub const IMAGE_URI_PARAMETER: &str = "ImageUri";

/// Stateful resources are removed together with the stack
const DELETION_POLICY: &str = "Delete";

/// CloudFormation template for a composed resource graph
#[derive(Clone, Debug)]
pub struct Template<'a> {
    graph: &'a ResourceGraph,
    stack: &'a Stack,
}

impl<'a> Template<'a> {
    pub fn new(graph: &'a ResourceGraph, stack: &'a Stack) -> Self {
        Template { graph, stack }
    }

    /// Full template document
    pub fn to_json(&self) -> Value {
        let mut resources = Map::new();

        for resource in self.graph.resources() {
            match resource {
                Resource::Function(function) => {
                    resources.insert(role_id(&function.id), self.role(function));
                    resources.insert(function.id.clone(), self.function(function));

                    for (source, batch_size) in self.graph.event_sources(&function.id) {
                        resources.insert(
                            format!("{}{source}EventSource", function.id),
                            self.event_source(function, source, batch_size),
                        );
                    }
                }

                Resource::Table(table) => {
                    resources.insert(table.id.clone(), self.table(table));
                }

                Resource::Queue(queue) => {
                    resources.insert(queue.id.clone(), self.queue(queue));
                }
            }
        }

        json!({
            "Description": self.stack.description,
            "Parameters": {
                IMAGE_URI_PARAMETER: {
                    "Type": "String",
                    "Description": "URI of the container image with the function code",
                },
            },
            "Resources": resources,
            "Outputs": self.outputs(),
        })
    }

    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_json())
    }

    /// The function itself, packaged as a container image
    fn function(&self, function: &FunctionResource) -> Value {
        json!({
            "Type": "AWS::Lambda::Function",
            "DependsOn": [role_id(&function.id)],
            "Properties": {
                "FunctionName": function.function_name,
                "PackageType": "Image",
                "Code": {
                    "ImageUri": { "Ref": IMAGE_URI_PARAMETER },
                },
                "MemorySize": function.memory_size,
                "Timeout": function.timeout.as_secs(),
                "Role": { "Fn::GetAtt": [role_id(&function.id), "Arn"] },
                "Environment": {
                    "Variables": self.environment(function),
                },
            },
            "Metadata": {
                "aws:asset:path": function.image_directory,
                "aws:asset:property": "Code.ImageUri",
            },
        })
    }

    fn environment(&self, function: &FunctionResource) -> Value {
        self.graph
            .environment(&function.id)
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    EnvValue::Literal(literal) => Value::String(literal.clone()),
                    EnvValue::Reference(id) => json!({ "Ref": id }),
                };

                (key.to_string(), value)
            })
            .collect::<Map<String, Value>>()
            .into()
    }

    /// Execution role of a function: logging plus one policy per grant
    fn role(&self, function: &FunctionResource) -> Value {
        let mut properties = json!({
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": "lambda.amazonaws.com" },
                    "Action": "sts:AssumeRole",
                }],
            },
            "ManagedPolicyArns": [{
                "Fn::Join": ["", [
                    "arn:",
                    { "Ref": "AWS::Partition" },
                    ":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole",
                ]],
            }],
        });

        let policies = self.policies(&function.id);

        if !policies.is_empty() {
            properties["Policies"] = Value::Array(policies);
        }

        json!({
            "Type": "AWS::IAM::Role",
            "Properties": properties,
        })
    }

    /// Policy statements to allow a function to access resources
    fn policies(&self, principal: &str) -> Vec<Value> {
        self.graph
            .grants(principal)
            .map(|(resource, access)| {
                json!({
                    "PolicyName": format!("{resource}{access:?}Policy"),
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": access.actions(),
                            "Resource": { "Fn::GetAtt": [resource, "Arn"] },
                        }],
                    },
                })
            })
            .collect()
    }

    fn event_source(&self, function: &FunctionResource, source: &str, batch_size: u32) -> Value {
        json!({
            "Type": "AWS::Lambda::EventSourceMapping",
            "DependsOn": [role_id(&function.id)],
            "Properties": {
                "FunctionName": { "Ref": function.id },
                "EventSourceArn": { "Fn::GetAtt": [source, "Arn"] },
                "BatchSize": batch_size,
            },
        })
    }

    fn table(&self, table: &TableResource) -> Value {
        let mut keys = vec![(&table.partition_key, "HASH")];

        if let Some(sort_key) = &table.sort_key {
            keys.push((sort_key, "RANGE"));
        }

        json!({
            "Type": "AWS::DynamoDB::Table",
            "Properties": {
                "TableName": table.table_name,
                "AttributeDefinitions": keys
                    .iter()
                    .map(|(name, _)| json!({ "AttributeName": name, "AttributeType": "S" }))
                    .collect::<Vec<_>>(),
                "KeySchema": keys
                    .iter()
                    .map(|(name, kind)| json!({ "AttributeName": name, "KeyType": kind }))
                    .collect::<Vec<_>>(),
                "BillingMode": "PAY_PER_REQUEST",
            },
            "DeletionPolicy": DELETION_POLICY,
            "UpdateReplacePolicy": DELETION_POLICY,
        })
    }

    fn queue(&self, queue: &QueueResource) -> Value {
        let mut properties = json!({
            "QueueName": queue.queue_name,
            "VisibilityTimeout": queue.visibility_timeout.as_secs(),
            "MessageRetentionPeriod": queue.retention_period.as_secs(),
        });

        // Standard queues reject these properties even when set to false
        if queue.fifo {
            properties["FifoQueue"] = json!(true);
            properties["ContentBasedDeduplication"] = json!(queue.content_based_deduplication);
        }

        json!({
            "Type": "AWS::SQS::Queue",
            "Properties": properties,
            "DeletionPolicy": DELETION_POLICY,
            "UpdateReplacePolicy": DELETION_POLICY,
        })
    }

    fn outputs(&self) -> Value {
        let mut outputs = Map::new();

        for resource in self.graph.resources() {
            let (name, description) = match resource {
                Resource::Function(_) => ("FunctionName", "Name of the service function"),
                Resource::Table(_) => ("TableName", "Name of the service table"),
                Resource::Queue(_) => ("QueueUrl", "URL of the service queue"),
            };

            outputs.insert(
                format!("{}{name}", resource.id()),
                json!({
                    "Description": description,
                    "Value": { "Ref": resource.id() },
                }),
            );
        }

        outputs.into()
    }
}

fn role_id(function_id: &str) -> String {
    format!("{function_id}Role")
}
